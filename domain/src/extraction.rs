//! Tolerant JSON extraction from generative model replies.
//!
//! Models asked to "return only JSON" still wrap their output in Markdown
//! fences or prose often enough that direct parsing is not sufficient.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use serde_json::Value;

/// Extracts a JSON value from raw model text.
///
/// Strips a leading/trailing ```` ```json ```` code fence if present, trims,
/// and attempts a direct parse. On failure, falls back to the substring
/// between the first `{` and the last `}` inclusive. Empty input or a
/// double parse failure is an unparseable-response error.
pub fn extract_json(text: &str) -> Result<Value, Error> {
    if text.is_empty() {
        return Err(unparseable("Empty model response"));
    }

    let trimmed = strip_code_fence(text.trim());

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Ok(value),
        Err(_) => {
            let start = trimmed.find('{');
            let end = trimmed.rfind('}');
            if let (Some(start), Some(end)) = (start, end) {
                if end > start {
                    let candidate = &trimmed[start..=end];
                    return serde_json::from_str::<Value>(candidate).map_err(|err| Error {
                        source: Some(Box::new(err)),
                        error_kind: DomainErrorKind::External(
                            ExternalErrorKind::UnparseableResponse(
                                "Failed to parse JSON from model response".to_string(),
                            ),
                        ),
                    });
                }
            }
            Err(unparseable("Failed to parse JSON from model response"))
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let mut out = text;
    if let Some(rest) = out.strip_prefix("```json") {
        out = rest.strip_prefix('\n').unwrap_or(rest);
    }
    if let Some(rest) = out.strip_suffix("```") {
        out = rest;
    }
    out.trim()
}

fn unparseable(msg: &str) -> Error {
    Error {
        source: None,
        error_kind: DomainErrorKind::External(ExternalErrorKind::UnparseableResponse(
            msg.to_string(),
        )),
    }
}
