//! Speech recognition provider trait.

use crate::types::recognition::{PollOutcome, RecognitionConfig};
use crate::Error;
use async_trait::async_trait;

/// Abstraction for asynchronous speech-to-text services.
///
/// Implementations start a long-running recognition job and expose its
/// completion state through polling. There is no push notification and no
/// cancellation of the remote job; poll cadence and give-up policy belong
/// to the caller.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Start an asynchronous recognition job for media already in storage.
    ///
    /// Returns immediately with an opaque operation handle; results become
    /// available through `poll_recognition` once the job completes.
    async fn start_recognition(&self, config: RecognitionConfig) -> Result<String, Error>;

    /// Read the current state of a recognition operation.
    ///
    /// Pure read with no side effects; safe to call an unbounded number of
    /// times. The aggregated transcript and confidence populate only when
    /// the returned outcome reports done.
    async fn poll_recognition(&self, operation_name: &str) -> Result<PollOutcome, Error>;

    /// Return unique identifier for this provider (e.g., "google_stt").
    ///
    /// Must be lowercase, alphanumeric with underscores only.
    fn provider_id(&self) -> &str;
}
