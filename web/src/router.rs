use crate::{controller::health_check_controller, params, AppState};
use axum::{
    routing::{get, post},
    Router,
};

use crate::controller::{audio_controller, summary_controller, transcription_controller};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Clinical Scribe API"
        ),
        paths(
            audio_controller::upload_init,
            transcription_controller::start,
            transcription_controller::status,
            summary_controller::summarize,
            summary_controller::review,
            summary_controller::finalise,
            health_check_controller::health_check,
            health_check_controller::gcp_health,
        ),
        components(
            schemas(
                domain::conversation::Conversation,
                domain::conversation::Status,
                domain::summarization::PatientContext,
                params::audio::UploadInitParams,
                params::transcription::StartParams,
                params::summary::SummarizeParams,
                params::summary::ReviewParams,
                params::summary::FinaliseParams,
            )
        ),
        tags(
            (name = "clinical_scribe", description = "Consultation transcription and summarization pipeline")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(audio_routes(app_state.clone()))
        .merge(transcription_routes(app_state.clone()))
        .merge(summary_routes(app_state.clone()))
        .merge(health_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn audio_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/audio/upload-init", post(audio_controller::upload_init))
        .with_state(app_state)
}

fn transcription_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/transcribe/start", post(transcription_controller::start))
        .route("/transcribe/status", get(transcription_controller::status))
        .with_state(app_state)
}

fn summary_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/summarize", post(summary_controller::summarize))
        .route("/review", post(summary_controller::review))
        .route("/finalise", post(summary_controller::finalise))
        .with_state(app_state)
}

fn health_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .route("/health/gcp", get(health_check_controller::gcp_health))
        .with_state(app_state)
}
