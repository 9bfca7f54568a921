//! Cloud Storage V4 signed-URL generation for browser audio uploads.
//!
//! Signing is entirely local: the canonical request is signed with the
//! service account's RSA key, so initiating an upload makes no network
//! call. The resulting URL grants a single `PUT` of the declared content
//! type until it expires; a mismatched upload is rejected by the storage
//! layer itself.

use crate::error::Error;
use chrono::{DateTime, Utc};
use log::*;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use service::config::{Config, ServiceAccountKey};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const SIGNING_ALGORITHM: &str = "GOOG4-RSA-SHA256";
const SIGNED_HEADERS: &str = "content-type;host";

/// A freshly minted upload grant.
#[derive(Debug, Clone)]
pub struct SignedUpload {
    pub upload_url: String,
    pub gcs_uri: String,
    pub object_name: String,
}

/// Signs Cloud Storage upload URLs with the configured service account key.
pub struct StorageSigner {
    bucket: String,
    base_url: String,
    key: ServiceAccountKey,
    expiry_secs: u64,
}

impl StorageSigner {
    pub fn new(bucket: String, base_url: String, key: ServiceAccountKey, expiry_secs: u64) -> Self {
        Self {
            bucket,
            base_url,
            key,
            expiry_secs,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let bucket = config
            .gcs_bucket()
            .ok_or_else(|| Error::config("GCS_BUCKET is required"))?;
        let key = config.service_account_key()?;
        Ok(Self::new(
            bucket,
            config.storage_base_url().to_string(),
            key,
            config.upload_url_expiry_secs,
        ))
    }

    /// Mints a write-only signed URL at a fresh, collision-resistant object
    /// name derived from a random token plus the sanitized file name.
    pub fn create_signed_upload_url(
        &self,
        content_type: &str,
        file_name: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<SignedUpload, Error> {
        let clean_name = sanitize_file_name(file_name);
        let object_name = format!("audio/{}-{}", Uuid::new_v4(), clean_name);
        let upload_url = self.signed_url_for_object(&object_name, content_type, issued_at)?;
        let gcs_uri = format!("gs://{}/{}", self.bucket, object_name);

        debug!("Created signed upload URL for {gcs_uri}");
        Ok(SignedUpload {
            upload_url,
            gcs_uri,
            object_name,
        })
    }

    /// Builds the V4 signed URL for one object. Deterministic for a fixed
    /// object name and issuance time.
    pub(crate) fn signed_url_for_object(
        &self,
        object_name: &str,
        content_type: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, Error> {
        let host = host_header(&self.base_url)?;
        let timestamp = issued_at.format("%Y%m%dT%H%M%SZ").to_string();
        let datestamp = issued_at.format("%Y%m%d").to_string();
        let credential_scope = format!("{datestamp}/auto/storage/goog4_request");
        let credential = format!("{}/{}", self.key.client_email, credential_scope);

        let resource_path = format!(
            "/{}/{}",
            urlencoding::encode(&self.bucket),
            encode_object_path(object_name)
        );

        // Already in lexicographic key order.
        let canonical_query = format!(
            "X-Goog-Algorithm={SIGNING_ALGORITHM}\
             &X-Goog-Credential={}\
             &X-Goog-Date={timestamp}\
             &X-Goog-Expires={}\
             &X-Goog-SignedHeaders={}",
            urlencoding::encode(&credential),
            self.expiry_secs,
            urlencoding::encode(SIGNED_HEADERS),
        );

        let canonical_request = format!(
            "PUT\n{resource_path}\n{canonical_query}\ncontent-type:{content_type}\nhost:{host}\n\n{SIGNED_HEADERS}\nUNSIGNED-PAYLOAD"
        );

        let hashed_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign =
            format!("{SIGNING_ALGORITHM}\n{timestamp}\n{credential_scope}\n{hashed_request}");

        let signature = self.sign(string_to_sign.as_bytes())?;

        Ok(format!(
            "{}{resource_path}?{canonical_query}&X-Goog-Signature={signature}",
            self.base_url.trim_end_matches('/'),
        ))
    }

    fn sign(&self, message: &[u8]) -> Result<String, Error> {
        let private_key =
            RsaPrivateKey::from_pkcs8_pem(&self.key.private_key).map_err(|err| {
                warn!("Failed to parse service account private key: {:?}", err);
                Error::config("Service account private key is not valid PKCS#8 PEM")
            })?;
        let signing_key = rsa::pkcs1v15::SigningKey::<rsa::sha2::Sha256>::new(private_key);
        let signature = signing_key.sign(message);
        Ok(hex::encode(signature.to_bytes()))
    }
}

/// Replaces every character outside `[A-Za-z0-9_.-]` with an underscore.
/// Empty input falls back to the default recorder file name.
pub fn sanitize_file_name(file_name: &str) -> String {
    if file_name.is_empty() {
        return "audio.webm".to_string();
    }
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Percent-encodes each object path segment, preserving `/` separators.
fn encode_object_path(object_name: &str) -> String {
    object_name
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn host_header(base_url: &str) -> Result<String, Error> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|_| Error::config("STORAGE_BASE_URL is not a valid URL"))?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::config("STORAGE_BASE_URL is missing a host"))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
