//! Upload initiation: mint a signed upload URL and a provisional
//! conversation record.

use crate::conversation::Conversation;
use crate::error::Error;
use crate::gateway::cloud_storage::StorageSigner;
use chrono::Utc;
use log::*;
use service::config::Config;

/// Caller-declared upload parameters, already defaulted by the web layer.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub content_type: String,
    pub file_name: String,
    pub language_code: String,
}

/// Everything the client needs to upload audio and continue the pipeline.
#[derive(Debug)]
pub struct UploadInit {
    pub upload_url: String,
    pub gcs_uri: String,
    pub conversation: Conversation,
}

/// Initiates an upload: signs a write-only URL for a fresh object and
/// constructs the provisional conversation record bound to it.
pub fn init_upload(config: &Config, request: UploadRequest) -> Result<UploadInit, Error> {
    let signer = StorageSigner::from_config(config)?;
    let signed = signer.create_signed_upload_url(
        &request.content_type,
        &request.file_name,
        Utc::now(),
    )?;

    let conversation =
        Conversation::pending_upload(signed.gcs_uri.clone(), request.language_code);

    info!(
        "Initiated upload for conversation {} at {}",
        conversation.id, signed.gcs_uri
    );

    Ok(UploadInit {
        upload_url: signed.upload_url,
        gcs_uri: signed.gcs_uri,
        conversation,
    })
}
