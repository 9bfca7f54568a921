//! Conversation records: one recorded consultation session tracked through
//! the pipeline.

use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Forward-only status tag for a conversation.
///
/// Each pipeline stage overwrites the status as it completes; transitions
/// are not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    PendingUpload,
    Processing,
    Transcribed,
    Summarized,
    Error,
}

/// One recorded consultation session.
///
/// Constructed at upload initiation and returned to the client, which
/// carries the IDs and handles forward to the later stages. Nothing in the
/// pipeline stores these records.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    pub created_at: DateTime<Utc>,
    /// Storage locator of the uploaded audio; None until upload completes.
    pub audio_gcs_uri: Option<String>,
    /// BCP-47 language tag.
    pub language_code: String,
    /// Speech model variant used for this conversation.
    pub stt_model: String,
    pub status: Status,
    /// Handle for the in-flight transcription job; None until started.
    pub operation_id: Option<String>,
    /// Last error message, if any.
    pub error: Option<String>,
}

impl Conversation {
    /// A provisional record for a freshly initiated upload.
    pub fn pending_upload(audio_gcs_uri: String, language_code: String) -> Self {
        Self {
            id: Id::new_v4(),
            created_at: Utc::now(),
            audio_gcs_uri: Some(audio_gcs_uri),
            language_code,
            stt_model: "medical_conversation".to_string(),
            status: Status::PendingUpload,
            operation_id: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_upload_carries_defaults() {
        let conversation = Conversation::pending_upload(
            "gs://scribe-audio/audio/x.webm".to_string(),
            "en-US".to_string(),
        );
        assert_eq!(conversation.status, Status::PendingUpload);
        assert_eq!(conversation.stt_model, "medical_conversation");
        assert!(conversation.operation_id.is_none());
        assert!(conversation.error.is_none());
    }

    #[test]
    fn serializes_with_camel_case_keys_and_snake_case_status() {
        let conversation = Conversation::pending_upload(
            "gs://scribe-audio/audio/x.webm".to_string(),
            "en-US".to_string(),
        );
        let value = serde_json::to_value(&conversation).unwrap();
        assert_eq!(value["status"], "pending_upload");
        assert_eq!(value["audioGcsUri"], "gs://scribe-audio/audio/x.webm");
        assert_eq!(value["sttModel"], "medical_conversation");
        assert!(value["createdAt"].is_string());
    }
}
