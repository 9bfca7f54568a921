//! Service-account token exchange for Google Cloud APIs.
//!
//! Mints an RS256 JWT-bearer assertion from the configured service account
//! key and exchanges it for an OAuth2 access token. The token is the one
//! piece of cross-call state in the process: it is fetched lazily on first
//! use, cached behind an RwLock, and refreshed only when close to expiry.

use crate::error::Error;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Tokens within this window of expiry are treated as expired so an
/// in-flight request never carries a token that lapses mid-call.
const EXPIRY_SLACK_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - ChronoDuration::seconds(EXPIRY_SLACK_SECS) > now
    }
}

/// Per-process access token cache.
///
/// Lazily initialized, read-mostly, refreshed in place; recreated only on
/// process restart.
pub struct TokenProvider {
    cache: RwLock<Option<CachedToken>>,
}

static SHARED: OnceLock<Arc<TokenProvider>> = OnceLock::new();

impl TokenProvider {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(None),
        }
    }

    /// The process-wide provider instance used by production gateways.
    pub fn shared() -> Arc<TokenProvider> {
        SHARED
            .get_or_init(|| Arc::new(TokenProvider::new()))
            .clone()
    }

    /// Returns a valid access token, fetching a fresh one only when the
    /// cached token is missing or near expiry.
    pub async fn access_token(&self, config: &Config) -> Result<String, Error> {
        let now = Utc::now();

        {
            let cache = self.cache.read().await;
            if let Some(token) = cache.as_ref() {
                if token.is_fresh(now) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = cache.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.access_token.clone());
            }
        }

        let token = fetch_token(config).await?;
        let access_token = token.access_token.clone();
        *cache = Some(token);
        Ok(access_token)
    }
}

impl Default for TokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_token(config: &Config) -> Result<CachedToken, Error> {
    let key = config.service_account_key()?;
    let token_url = key
        .token_uri
        .clone()
        .unwrap_or_else(|| config.oauth_token_url().to_string());

    let issued_at = Utc::now();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: CLOUD_PLATFORM_SCOPE,
        aud: &token_url,
        iat: issued_at.timestamp(),
        exp: issued_at.timestamp() + 3600,
    };
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    let assertion = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?;

    let client = reqwest::Client::builder().use_rustls_tls().build()?;

    debug!("Exchanging service account assertion for access token");
    let response = client
        .post(&token_url)
        .form(&[
            ("grant_type", JWT_BEARER_GRANT_TYPE),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await
        .map_err(|e| {
            warn!("Token exchange request failed: {:?}", e);
            Error::from(e)
        })?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        error!("Token endpoint: {}", error_text);
        return Err(Error::from(scribe_ai::Error::Authentication(error_text)));
    }

    let token: TokenResponse = response.json().await.map_err(|e| {
        warn!("Failed to parse token response: {:?}", e);
        Error::from(scribe_ai::Error::Deserialization(
            "Invalid response from token endpoint".to_string(),
        ))
    })?;

    Ok(CachedToken {
        expires_at: issued_at + ChronoDuration::seconds(token.expires_in),
        access_token: token.access_token,
    })
}
