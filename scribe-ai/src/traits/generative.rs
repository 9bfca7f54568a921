//! Generative text provider trait.

use crate::types::generation::{GenerationRequest, GenerationResponse};
use crate::Error;
use async_trait::async_trait;

/// Abstraction for single-shot generative text services.
///
/// One request, one reply, no conversation state. Implementations flatten
/// whatever candidate/part structure the provider returns into plain text;
/// JSON extraction from that text is a caller concern.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Invoke the model once and return its reply as text.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, Error>;

    /// Return unique identifier for this provider (e.g., "vertex_gemini").
    fn provider_id(&self) -> &str;
}
