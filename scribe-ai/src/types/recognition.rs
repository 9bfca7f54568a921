//! Types for long-running speech recognition jobs.

use crate::types::audio::{AudioEncoding, OPUS_SAMPLE_RATE_HERTZ};
use serde::{Deserialize, Serialize};

/// Configuration for starting a recognition job.
///
/// The media must already live in object storage reachable by the provider;
/// recognition is started against the URI, not uploaded bytes.
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    pub media_uri: String,
    pub language_code: String,
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    /// Recognition model variant, e.g. "medical_conversation".
    pub model: String,
    pub enable_diarization: bool,
    /// Expected speaker count when diarization is enabled.
    pub speaker_count: u32,
    /// Optional phrase hints biasing recognition toward expected vocabulary.
    pub phrase_hints: Vec<String>,
}

impl RecognitionConfig {
    /// A consultation-recording config: medical conversation model, two
    /// speakers, encoding inferred from the media URI, Opus at 48 kHz.
    pub fn medical_conversation(media_uri: &str, language_code: &str) -> Self {
        Self {
            encoding: AudioEncoding::from_uri(media_uri),
            media_uri: media_uri.to_string(),
            language_code: language_code.to_string(),
            sample_rate_hertz: OPUS_SAMPLE_RATE_HERTZ,
            model: "medical_conversation".to_string(),
            enable_diarization: true,
            speaker_count: 2,
            phrase_hints: Vec::new(),
        }
    }
}

/// One recognized segment's best alternative, as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentAlternative {
    pub transcript: Option<String>,
    pub confidence: Option<f64>,
}

/// Aggregated result of a completed recognition job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionOutcome {
    /// Best-alternative texts joined by newlines, in provider order.
    pub transcript: String,
    /// Mean of the confidences the provider reported; `None` when no
    /// segment carried one.
    pub confidence: Option<f64>,
}

impl RecognitionOutcome {
    /// Folds per-segment alternatives into a single transcript.
    ///
    /// Segments with an empty or absent transcript are skipped entirely.
    /// The confidence average divides by the number of segments that
    /// actually reported a confidence, not the total segment count.
    pub fn from_alternatives(alternatives: &[SegmentAlternative]) -> Self {
        let mut transcript = String::new();
        let mut total_confidence = 0.0;
        let mut confidence_count = 0u32;

        for alternative in alternatives {
            let Some(text) = alternative.transcript.as_deref() else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            if !transcript.is_empty() {
                transcript.push('\n');
            }
            transcript.push_str(text);
            if let Some(confidence) = alternative.confidence {
                total_confidence += confidence;
                confidence_count += 1;
            }
        }

        let confidence = if confidence_count > 0 {
            Some(total_confidence / f64::from(confidence_count))
        } else {
            None
        };

        Self { transcript, confidence }
    }
}

/// A single poll of a long-running recognition operation.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub done: bool,
    /// Populated only when `done` is true.
    pub outcome: Option<RecognitionOutcome>,
    /// The unmodified provider response, passed through for audit/debugging.
    pub raw: serde_json::Value,
}

impl PollOutcome {
    pub fn pending(raw: serde_json::Value) -> Self {
        Self { done: false, outcome: None, raw }
    }

    pub fn completed(outcome: RecognitionOutcome, raw: serde_json::Value) -> Self {
        Self { done: true, outcome: Some(outcome), raw }
    }
}
