//! Controller for upload initiation.

use crate::params::audio::UploadInitParams;
use crate::{AppState, Error};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use domain::conversation::Conversation;
use domain::upload::{self, UploadRequest};
use log::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadInitResponse {
    pub ok: bool,
    /// Write-only signed URL the browser PUTs the recording to.
    pub upload_url: String,
    /// Canonical storage locator for the uploaded object.
    pub gcs_uri: String,
    pub conversation: Conversation,
}

/// POST /audio/upload-init
///
/// Mints a time-limited signed upload URL at a fresh object name and
/// returns a provisional conversation record. An empty or missing body
/// succeeds using the recorder defaults.
#[utoipa::path(
    post,
    path = "/audio/upload-init",
    request_body = UploadInitParams,
    responses(
        (status = 200, description = "Upload URL created", body = UploadInitResponse),
        (status = 400, description = "Failed to init upload"),
    )
)]
pub async fn upload_init(
    State(app_state): State<AppState>,
    body: Result<Json<UploadInitParams>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    // All fields default, so a body that never arrived is not an error.
    let Json(params) = body.unwrap_or_else(|_| Json(UploadInitParams::default()));

    debug!("POST upload-init for file: {}", params.file_name);

    let init = upload::init_upload(
        &app_state.config,
        UploadRequest {
            content_type: params.content_type,
            file_name: params.file_name,
            language_code: params.language_code,
        },
    )?;

    Ok(Json(UploadInitResponse {
        ok: true,
        upload_url: init.upload_url,
        gcs_uri: init.gcs_uri,
        conversation: init.conversation,
    }))
}
