//! Gateways to the external Google Cloud providers the pipeline calls out to.
//!
//! Each gateway is a thin reqwest client over one provider API. None of them
//! retries by default; `with_retries` wraps outbound calls and is a no-op
//! until `--provider-max-retries` is raised above zero.

pub mod cloud_storage;
pub mod gcp_auth;
pub mod speech;
pub mod vertex;

use log::*;
use scribe_ai::Error;
use service::config::Config;
use std::future::Future;
use tokio::time::Duration;

/// Runs an outbound provider call, retrying transient network failures with
/// exponential backoff when the config asks for it. Provider-reported errors
/// are never retried; the provider already made a decision about the request.
pub(crate) async fn with_retries<T, F, Fut>(
    config: &Config,
    operation: &str,
    mut call: F,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let max_retries = config.provider_max_retries;
    let mut attempt: u32 = 0;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(Error::Network(msg)) if attempt < max_retries => {
                let delay = config
                    .provider_retry_base_ms
                    .saturating_mul(1u64 << attempt.min(16));
                warn!(
                    "{operation} failed with network error (attempt {}/{}), retrying in {delay}ms: {msg}",
                    attempt + 1,
                    max_retries + 1
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
