//! Controller for transcription start and status operations.
//!
//! Start returns only the opaque operation name; the browser owns the poll
//! loop and its cadence, calling status until it reports done.

use crate::params::transcription::{StartParams, StatusParams};
use crate::{AppState, Error};

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use domain::transcription;
use domain::AudioEncoding;
use log::*;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartResponse {
    pub ok: bool,
    /// Opaque handle for the in-flight recognition job.
    pub operation_name: String,
}

/// POST /transcribe/start
///
/// Starts an asynchronous medical-conversation recognition job against a
/// previously uploaded object. Does not block for completion.
#[utoipa::path(
    post,
    path = "/transcribe/start",
    request_body = StartParams,
    responses(
        (status = 200, description = "Recognition started", body = StartResponse),
        (status = 400, description = "Missing gcsUri or provider failure"),
    )
)]
pub async fn start(
    State(app_state): State<AppState>,
    body: Result<Json<StartParams>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(params) = body.map_err(|rejection| Error::validation(rejection.body_text()))?;
    if params.gcs_uri.is_empty() {
        return Err(Error::validation("gcsUri is required"));
    }
    let encoding = params
        .encoding
        .as_deref()
        .map(|tag| {
            AudioEncoding::from_api_tag(tag)
                .ok_or_else(|| Error::validation(format!("Unsupported encoding: {tag}")))
        })
        .transpose()?;

    debug!("POST transcribe/start for {}", params.gcs_uri);

    let operation_name = transcription::start(
        &app_state.config,
        &params.gcs_uri,
        &params.language_code,
        encoding,
        params.speech_contexts,
    )
    .await?;

    Ok(Json(StartResponse {
        ok: true,
        operation_name,
    }))
}

/// GET /transcribe/status
///
/// Reads the state of a recognition operation. While the job is running the
/// response carries only `done: false`; once complete it carries the
/// newline-joined transcript, the average confidence, and the raw provider
/// response. Pure read, safe to poll repeatedly.
#[utoipa::path(
    get,
    path = "/transcribe/status",
    params(StatusParams),
    responses(
        (status = 200, description = "Operation state", body = serde_json::Value),
        (status = 400, description = "Missing operationName or provider failure"),
    )
)]
pub async fn status(
    State(app_state): State<AppState>,
    query: Result<Query<StatusParams>, QueryRejection>,
) -> Result<impl IntoResponse, Error> {
    let Query(params) = query.map_err(|rejection| Error::validation(rejection.body_text()))?;
    if params.operation_name.is_empty() {
        return Err(Error::validation("operationName is required"));
    }

    debug!("GET transcribe/status for {}", params.operation_name);

    let poll = transcription::status(&app_state.config, &params.operation_name).await?;

    let body = if poll.done {
        json!({
            "ok": true,
            "done": true,
            "transcript": poll.transcript,
            "confidence": poll.confidence,
            "raw": poll.raw,
        })
    } else {
        json!({"ok": true, "done": false})
    };
    Ok(Json(body))
}
