//! Clinical scribe abstraction layer for speech recognition and generative
//! text providers.
//!
//! This crate provides trait-based abstractions for the consultation
//! pipeline:
//! - Long-running speech-to-text jobs (start once, poll until done)
//! - Single-shot generative text invocations with a system instruction
//!
//! The design is provider-agnostic, enabling applications to swap between
//! different service providers (Google Speech-to-Text, Vertex AI, etc.)
//! without changing application code.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::Error;
pub use types::audio::AudioEncoding;
pub use types::recognition::RecognitionOutcome;
