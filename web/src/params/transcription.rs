use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

fn default_language_code() -> String {
    "en-US".to_string()
}

/// Body of the transcription-start request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartParams {
    pub(crate) gcs_uri: String,
    #[serde(default = "default_language_code")]
    pub(crate) language_code: String,
    /// Explicit container tag ("WEBM_OPUS" or "OGG_OPUS"). When absent the
    /// encoding is inferred from the URI's file extension.
    #[serde(default)]
    pub(crate) encoding: Option<String>,
    /// Optional phrase hints biasing recognition.
    #[serde(default)]
    pub(crate) speech_contexts: Vec<String>,
}

/// Query of the transcription-status request.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub(crate) struct StatusParams {
    pub(crate) operation_name: String,
}
