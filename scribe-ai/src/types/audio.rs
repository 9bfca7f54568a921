//! Audio container/encoding tags for recorded consultation audio.

use serde::{Deserialize, Serialize};

/// Opus sample rate the browser recorder produces. Speech providers reject
/// mismatched rates, so the value is fixed rather than configurable.
pub const OPUS_SAMPLE_RATE_HERTZ: u32 = 48_000;

/// Audio container encoding understood by the speech provider.
///
/// Browser recorders emit Opus either in a WebM or an Ogg container; the
/// provider needs to be told which one, since object storage carries no
/// codec metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEncoding {
    WebmOpus,
    OggOpus,
}

impl AudioEncoding {
    /// Infers the encoding from a storage URI's file extension.
    ///
    /// `.ogg` (case-insensitive, with or without a query suffix) maps to
    /// Ogg/Opus; everything else defaults to WebM/Opus. This inspects the
    /// file name only, not the uploaded bytes, and is a known fragility:
    /// a mislabeled object will be handed to the provider with the wrong
    /// container tag.
    pub fn from_uri(uri: &str) -> Self {
        let lower = uri.to_lowercase();
        if lower.ends_with(".ogg") || lower.contains(".ogg?") {
            AudioEncoding::OggOpus
        } else {
            AudioEncoding::WebmOpus
        }
    }

    /// Parses a caller-declared provider wire tag. Declaring the encoding
    /// explicitly sidesteps the file-name heuristic entirely.
    pub fn from_api_tag(tag: &str) -> Option<Self> {
        match tag {
            "WEBM_OPUS" => Some(AudioEncoding::WebmOpus),
            "OGG_OPUS" => Some(AudioEncoding::OggOpus),
            _ => None,
        }
    }

    /// The provider wire tag for this encoding.
    pub fn as_api_tag(&self) -> &'static str {
        match self {
            AudioEncoding::WebmOpus => "WEBM_OPUS",
            AudioEncoding::OggOpus => "OGG_OPUS",
        }
    }
}
