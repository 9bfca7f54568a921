//! Error types for scribe AI operations.

use std::fmt;

/// Universal error type that abstracts provider-specific errors into common variants.
///
/// All provider implementations map their native errors to these variants,
/// preserving message context while maintaining a provider-agnostic
/// interface. Callers translate them into their own error taxonomy at the
/// layer boundary.
#[derive(Debug)]
pub enum Error {
    /// Credential exchange or token minting failures. Indicates the service
    /// account key is invalid, expired, or lacks necessary permissions.
    Authentication(String),

    /// Network connectivity issues, DNS failures, or connection timeouts.
    /// These errors are typically transient.
    Network(String),

    /// Invalid parameters, missing required fields, or malformed
    /// configuration. These indicate a caller error and should be fixed at
    /// the call site.
    Configuration(String),

    /// Provider-level business failures (job rejected, operation errored,
    /// quota exceeded). The message carries the provider's own error text.
    Provider(String),

    /// A long-running operation exceeded its caller-supplied deadline.
    Timeout(String),

    /// A poll loop was cancelled by its caller before the operation
    /// completed. The remote job itself keeps running.
    Cancelled,

    /// The provider responded with a body that could not be deserialized
    /// into the expected wire shape.
    Deserialization(String),

    /// Catch-all for errors that don't fit other categories.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Provider(msg) => write!(f, "Provider error: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::Cancelled => write!(f, "Operation cancelled"),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::Other(err) => write!(f, "Other error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
