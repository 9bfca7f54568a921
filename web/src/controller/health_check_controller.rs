//! Health and configuration probes.

use crate::AppState;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// GET liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = String),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}

/// GET /health/gcp
///
/// Reports the Google Cloud configuration this process is running with:
/// project, bucket, model location, and whether a usable service account
/// key is present. Configuration failures surface here as a 500 rather
/// than waiting to break the first pipeline call.
#[utoipa::path(
    get,
    path = "/health/gcp",
    responses(
        (status = 200, description = "Configuration summary", body = serde_json::Value),
        (status = 500, description = "Invalid configuration"),
    )
)]
pub async fn gcp_health(State(app_state): State<AppState>) -> impl IntoResponse {
    let config = &app_state.config;

    match config.service_account_key() {
        Ok(key) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "projectId": config.gcp_project_id(),
                "bucket": config.gcs_bucket(),
                "vertexLocation": config.vertex_location(),
                "serviceAccountEmail": key.client_email,
                "hasServiceAccountKey": true,
            })),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"ok": false, "error": err.to_string()})),
        ),
    }
}
