//! Business layer for the clinical consultation scribe pipeline.
//!
//! Each pipeline stage (upload initiation, transcription start/poll,
//! summarization, review, finalisation) is a stateless operation over the
//! external Google Cloud providers reached through `gateway`. Nothing here
//! persists state; Conversation/Transcript/Summary records are constructed
//! per call and handed back to the caller, which carries the opaque handles
//! (upload URL, operation name) forward to later stages.

pub mod conversation;
pub mod error;
pub mod extraction;
pub mod gateway;
pub mod prompts;
pub mod summarization;
pub mod summary;
pub mod transcript;
pub mod transcription;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use scribe_ai::AudioEncoding;

pub type Id = uuid::Uuid;
