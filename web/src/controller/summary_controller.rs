//! Controller for the generative stages: summarize, review, finalise.

use crate::params::summary::{FinaliseParams, ReviewParams, SummarizeParams};
use crate::{AppState, Error};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use domain::summarization;
use log::*;
use serde::Serialize;
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummarizeResponse {
    pub ok: bool,
    /// Structured clinical note sections extracted from the model reply.
    #[schema(value_type = Object)]
    pub summary_json: Value,
}

/// POST /summarize
///
/// Turns a transcript (plus optional patient context) into a structured
/// clinical note via one generative model invocation.
#[utoipa::path(
    post,
    path = "/summarize",
    request_body = SummarizeParams,
    responses(
        (status = 200, description = "Structured note produced", body = SummarizeResponse),
        (status = 400, description = "Validation, provider, or model-output failure"),
    )
)]
pub async fn summarize(
    State(app_state): State<AppState>,
    body: Result<Json<SummarizeParams>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(params) = body.map_err(|rejection| Error::validation(rejection.body_text()))?;
    if params.transcript.is_empty() {
        return Err(Error::validation("transcript required"));
    }

    debug!("POST summarize ({} transcript chars)", params.transcript.len());

    let summary = summarization::summarize(
        &app_state.config,
        &params.transcript,
        params.patient_context,
    )
    .await?;

    Ok(Json(SummarizeResponse {
        ok: true,
        summary_json: summary.structured_json,
    }))
}

/// POST /review
///
/// Critiques the summarizer's proposed note against the transcript with a
/// second model invocation.
#[utoipa::path(
    post,
    path = "/review",
    request_body = ReviewParams,
    responses(
        (status = 200, description = "Critique produced", body = serde_json::Value),
        (status = 400, description = "Validation, provider, or model-output failure"),
    )
)]
pub async fn review(
    State(app_state): State<AppState>,
    body: Result<Json<ReviewParams>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(params) = body.map_err(|rejection| Error::validation(rejection.body_text()))?;
    if params.transcript.is_empty() {
        return Err(Error::validation("transcript required"));
    }

    debug!("POST review");

    let critique = summarization::review(
        &app_state.config,
        &params.transcript,
        &params.proposed_json,
    )
    .await?;

    Ok(Json(json!({"ok": true, "review": critique})))
}

/// POST /finalise
///
/// Folds reviewer feedback into the final note fields. The model's fields
/// are merged flat into the response body rather than nested.
#[utoipa::path(
    post,
    path = "/finalise",
    request_body = FinaliseParams,
    responses(
        (status = 200, description = "Final fields produced", body = serde_json::Value),
        (status = 400, description = "Validation, provider, or model-output failure"),
    )
)]
pub async fn finalise(
    State(app_state): State<AppState>,
    body: Result<Json<FinaliseParams>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(params) = body.map_err(|rejection| Error::validation(rejection.body_text()))?;

    debug!("POST finalise");

    let final_fields = summarization::finalise(&app_state.config, &params.review).await?;

    // `ok` first so a model-produced field of the same name wins, matching
    // the flattening contract.
    let mut merged = Map::new();
    merged.insert("ok".to_string(), Value::Bool(true));
    if let Some(fields) = final_fields.as_object() {
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
    }
    Ok(Json(Value::Object(merged)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use clap::Parser;
    use service::config::Config;

    fn app_state() -> AppState {
        // Explicit empty argv keeps the config independent of the test
        // environment; no provider URL is ever dereferenced in these tests.
        let config = Config::try_parse_from(["clinical_scribe_rs"]).unwrap();
        AppState::new(config)
    }

    #[tokio::test]
    async fn summarize_rejects_empty_transcript_before_any_outbound_call() {
        let response = summarize(
            State(app_state()),
            Ok(Json(SummarizeParams {
                transcript: String::new(),
                patient_context: None,
            })),
        )
        .await
        .map(IntoResponse::into_response)
        .unwrap_or_else(IntoResponse::into_response);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "transcript required");
    }

    #[tokio::test]
    async fn review_rejects_empty_transcript() {
        let response = review(
            State(app_state()),
            Ok(Json(ReviewParams {
                transcript: String::new(),
                proposed_json: json!({}),
            })),
        )
        .await
        .map(IntoResponse::into_response)
        .unwrap_or_else(IntoResponse::into_response);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
