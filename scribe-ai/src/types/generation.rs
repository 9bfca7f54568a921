//! Types for single-shot generative text invocations.

use serde::{Deserialize, Serialize};

/// A single generative model invocation.
///
/// The system instruction sets the model's behavior for the call; the user
/// text carries the actual material (transcript, proposed note, review).
/// Pipeline stages differ only in which instruction document they load and
/// how they build the user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_instruction: Option<String>,
    pub user_text: String,
}

impl GenerationRequest {
    pub fn with_system(system_instruction: String, user_text: String) -> Self {
        Self {
            system_instruction: Some(system_instruction),
            user_text,
        }
    }
}

/// The model's reply, flattened to plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
    /// Name of the model that produced the reply.
    pub model: String,
}
