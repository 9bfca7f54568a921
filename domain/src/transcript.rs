//! Transcript records: the text output of speech recognition for a
//! conversation.

use crate::Id;
use chrono::{DateTime, Utc};
use scribe_ai::RecognitionOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// The recognized text for one conversation.
///
/// `text` is non-empty only once the underlying operation reported done.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[schema(value_type = uuid::Uuid)]
    pub conversation_id: Id,
    /// Recognized utterances joined by newlines, in provider order.
    pub text: String,
    /// Mean of the per-segment confidences; None when none were reported.
    pub confidence: Option<f64>,
    /// Opaque pass-through of the raw provider output.
    #[schema(value_type = Option<Object>)]
    pub words_json: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub diarization: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl Transcript {
    /// Builds a transcript record from a completed recognition outcome.
    pub fn from_outcome(conversation_id: Id, outcome: RecognitionOutcome, raw: Value) -> Self {
        Self {
            id: Id::new_v4(),
            conversation_id,
            text: outcome.transcript,
            confidence: outcome.confidence,
            words_json: if raw.is_null() { None } else { Some(raw) },
            diarization: None,
            created_at: Utc::now(),
        }
    }
}
