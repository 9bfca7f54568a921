//! Summary records: the structured clinical note derived from a transcript.

use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A structured clinical note produced by the generative model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    /// Back-reference to the conversation, when the caller supplied one.
    #[schema(value_type = Option<uuid::Uuid>)]
    pub conversation_id: Option<Id>,
    /// Mapping of note-section name to text.
    #[schema(value_type = Object)]
    pub structured_json: Value,
    /// The model's reply before JSON extraction.
    pub raw_summary_text: String,
    /// Name of the generative model used.
    pub model: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl Summary {
    /// First version of a note freshly extracted from a model reply.
    pub fn from_model_output(structured_json: Value, raw_summary_text: String, model: String) -> Self {
        Self {
            id: Id::new_v4(),
            conversation_id: None,
            structured_json,
            raw_summary_text,
            model,
            version: 1,
            created_at: Utc::now(),
        }
    }
}
