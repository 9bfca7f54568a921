//! Loading of the model instruction documents.
//!
//! The documents are versionable content assets living in the configured
//! prompts directory, not code. Each pipeline stage names the one it needs.

use crate::error::Error;
use log::*;
use service::config::Config;
use std::path::Path;

/// System instruction for the summarizer stage.
pub const SUMMARIZATION_PROMPT: &str = "ai-summarization-prompt.md";
/// System instruction for the reviewer stage.
pub const REVIEWER_PROMPT: &str = "ai-documentation-reviewer.md";
/// System instruction for the finaliser stage.
pub const FINALISER_PROMPT: &str = "final-summariser.md";

/// Reads an instruction document from the prompts directory.
pub async fn load_prompt(config: &Config, file_name: &str) -> Result<String, Error> {
    let path = Path::new(config.prompts_dir()).join(file_name);
    tokio::fs::read_to_string(&path).await.map_err(|err| {
        warn!("Failed to load instruction document {:?}: {}", path, err);
        Error {
            source: Some(Box::new(err)),
            error_kind: crate::error::DomainErrorKind::Internal(
                crate::error::InternalErrorKind::Config(format!(
                    "Failed to load instruction document {file_name}"
                )),
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::config_from_args;

    #[tokio::test]
    async fn loads_a_document_from_the_configured_directory() {
        let dir = std::env::temp_dir().join(format!("prompts-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SUMMARIZATION_PROMPT), "You are a scribe.").unwrap();

        let dir_str = dir.to_str().unwrap().to_string();
        let config = config_from_args(&[("--prompts-dir", &dir_str)]);

        let prompt = load_prompt(&config, SUMMARIZATION_PROMPT).await.unwrap();
        assert_eq!(prompt, "You are a scribe.");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn missing_documents_are_config_errors() {
        let dir = std::env::temp_dir().join(format!("prompts-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let dir_str = dir.to_str().unwrap().to_string();
        let config = config_from_args(&[("--prompts-dir", &dir_str)]);

        let err = load_prompt(&config, REVIEWER_PROMPT).await.unwrap_err();
        assert!(err.message().contains(REVIEWER_PROMPT));

        std::fs::remove_dir_all(&dir).ok();
    }
}
