use serde::Deserialize;
use utoipa::ToSchema;

/// Body of the upload-init request. Every field is optional; an empty or
/// missing body falls back to the browser recorder defaults.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct UploadInitParams {
    pub(crate) content_type: String,
    pub(crate) file_name: String,
    pub(crate) language_code: String,
}

impl Default for UploadInitParams {
    fn default() -> Self {
        Self {
            content_type: "audio/webm".to_string(),
            file_name: "audio.webm".to_string(),
            language_code: "en-US".to_string(),
        }
    }
}
