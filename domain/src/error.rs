//! Error types for the `domain` layer.
use service::config::ServiceAccountKeyError;
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries: `web` depends on `domain` but not on the gateway plumbing, and
/// uses the `error_kind` tree to decide what to render to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// A request failed validation before any outbound call was made.
    Validation(String),
    /// Required configuration (project, bucket, credentials, prompt assets)
    /// is missing or unusable.
    Config(String),
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network(String),
    /// The provider accepted the call and reported a failure of its own.
    Provider(String),
    /// The generative model's reply contained no parseable JSON.
    UnparseableResponse(String),
    /// The model's JSON parsed but did not match the expected shape.
    UnexpectedShape(String),
    Other(String),
}

impl Error {
    /// The human-readable message rendered to API clients.
    pub fn message(&self) -> &str {
        match &self.error_kind {
            DomainErrorKind::Internal(kind) => match kind {
                InternalErrorKind::Validation(msg)
                | InternalErrorKind::Config(msg)
                | InternalErrorKind::Other(msg) => msg,
            },
            DomainErrorKind::External(kind) => match kind {
                ExternalErrorKind::Network(msg)
                | ExternalErrorKind::Provider(msg)
                | ExternalErrorKind::UnparseableResponse(msg)
                | ExternalErrorKind::UnexpectedShape(msg)
                | ExternalErrorKind::Other(msg) => msg,
            },
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation(msg.into())),
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config(msg.into())),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {}", self.message())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            let msg = err.to_string();
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network(msg)),
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config(
                "Failed to sign service account assertion".to_string(),
            )),
        }
    }
}

impl From<ServiceAccountKeyError> for Error {
    fn from(err: ServiceAccountKeyError) -> Self {
        let msg = err.to_string();
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config(msg)),
        }
    }
}

// This is where we translate errors from the `scribe-ai` provider layer to
// the `domain` layer.
impl From<scribe_ai::Error> for Error {
    fn from(err: scribe_ai::Error) -> Self {
        let error_kind = match &err {
            scribe_ai::Error::Network(msg) => {
                DomainErrorKind::External(ExternalErrorKind::Network(msg.clone()))
            }
            scribe_ai::Error::Authentication(msg) | scribe_ai::Error::Configuration(msg) => {
                DomainErrorKind::Internal(InternalErrorKind::Config(msg.clone()))
            }
            scribe_ai::Error::Provider(msg) => {
                DomainErrorKind::External(ExternalErrorKind::Provider(msg.clone()))
            }
            scribe_ai::Error::Deserialization(msg) => {
                DomainErrorKind::External(ExternalErrorKind::Other(msg.clone()))
            }
            scribe_ai::Error::Timeout(msg) => {
                DomainErrorKind::External(ExternalErrorKind::Other(msg.clone()))
            }
            scribe_ai::Error::Cancelled => DomainErrorKind::External(ExternalErrorKind::Other(
                "Transcription polling cancelled".to_string(),
            )),
            scribe_ai::Error::Other(inner) => {
                DomainErrorKind::External(ExternalErrorKind::Other(inner.to_string()))
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
