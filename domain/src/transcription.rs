//! Transcription stage: start a long-running recognition job and observe
//! its completion.
//!
//! Starting and polling are independent stateless calls threaded together
//! only by the opaque operation name the client carries between them. For
//! callers that want the service to drive the loop, `await_completion`
//! wraps the poller in an explicit state machine with a deadline and a
//! cancellation token.

use crate::conversation::Conversation;
use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::gateway::speech::SpeechClient;
use crate::transcript::Transcript;
use log::*;
use scribe_ai::traits::speech::Provider;
use scribe_ai::types::poll::{PollEvent, PollState};
use scribe_ai::types::recognition::RecognitionConfig;
use scribe_ai::AudioEncoding;
use serde_json::Value;
use service::config::Config;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// One poll of the transcription operation, shaped for the status endpoint.
#[derive(Debug)]
pub struct TranscriptionStatus {
    pub done: bool,
    pub transcript: Option<String>,
    pub confidence: Option<f64>,
    /// The unmodified provider response; populated only when done.
    pub raw: Option<Value>,
}

/// Starts a long-running medical-conversation recognition job and returns
/// the opaque operation name without blocking for completion.
///
/// A caller-declared `encoding` overrides the file-extension heuristic;
/// without one the container tag is inferred from the URI.
pub async fn start(
    config: &Config,
    gcs_uri: &str,
    language_code: &str,
    encoding: Option<AudioEncoding>,
    phrase_hints: Vec<String>,
) -> Result<String, Error> {
    let client = SpeechClient::from_config(config)?;
    let mut recognition_config = RecognitionConfig::medical_conversation(gcs_uri, language_code);
    if let Some(encoding) = encoding {
        recognition_config.encoding = encoding;
    }
    recognition_config.phrase_hints = phrase_hints;
    let operation_name = client.start_recognition(recognition_config).await?;
    Ok(operation_name)
}

/// Reads the current state of a recognition operation. Pure read; safe to
/// call any number of times.
pub async fn status(config: &Config, operation_name: &str) -> Result<TranscriptionStatus, Error> {
    let client = SpeechClient::from_config(config)?;
    let poll = client.poll_recognition(operation_name).await?;

    if !poll.done {
        return Ok(TranscriptionStatus {
            done: false,
            transcript: None,
            confidence: None,
            raw: None,
        });
    }

    let outcome = poll.outcome.unwrap_or_default();
    Ok(TranscriptionStatus {
        done: true,
        transcript: Some(outcome.transcript),
        confidence: outcome.confidence,
        raw: Some(poll.raw),
    })
}

/// Options for a server-driven poll loop.
#[derive(Debug, Clone)]
pub struct AwaitOptions {
    pub interval: Duration,
    pub deadline: Duration,
    pub cancel: CancellationToken,
}

/// Drives the poller until the operation completes, the deadline passes, or
/// the caller cancels. Cancellation and expiry stop the loop only; the
/// remote recognition job keeps running either way.
pub async fn await_completion(
    config: &Config,
    conversation: &Conversation,
    operation_name: &str,
    options: AwaitOptions,
) -> Result<Transcript, Error> {
    let started_at = Instant::now();
    let mut state = PollState::new();

    loop {
        tokio::select! {
            _ = options.cancel.cancelled() => {
                debug!("Poll loop for {} cancelled after {} attempts", operation_name, state.attempts());
                state = state.advance(PollEvent::Cancelled);
                debug_assert!(state.is_terminal());
                return Err(Error::from(scribe_ai::Error::Cancelled));
            }
            _ = tokio::time::sleep(options.interval) => {
                if started_at.elapsed() >= options.deadline {
                    state = state.advance(PollEvent::DeadlineReached);
                    warn!("Poll loop for {} reached {:?} (state {:?})", operation_name, options.deadline, state);
                    return Err(Error {
                        source: None,
                        error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                            "Transcription did not complete before the deadline".to_string(),
                        )),
                    });
                }

                let poll = status(config, operation_name).await?;
                if poll.done {
                    state = state.advance(PollEvent::Completed);
                    debug!("Poll loop for {} finished in state {:?}", operation_name, state);
                    let outcome = scribe_ai::RecognitionOutcome {
                        transcript: poll.transcript.unwrap_or_default(),
                        confidence: poll.confidence,
                    };
                    return Ok(Transcript::from_outcome(
                        conversation.id,
                        outcome,
                        poll.raw.unwrap_or(Value::Null),
                    ));
                }
                state = state.advance(PollEvent::Tick);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mock_provider_config;
    use serde_json::json;

    async fn token_mock(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(json!({"access_token": "test-token", "expires_in": 3600}).to_string())
            .create_async()
            .await
    }

    #[tokio::test]
    async fn status_maps_pending_operations() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        server
            .mock("GET", "/v1/operations/op-1")
            .with_status(200)
            .with_body(json!({"name": "op-1"}).to_string())
            .create_async()
            .await;

        let config = mock_provider_config(&server.url(), &[]);
        let poll = status(&config, "op-1").await.unwrap();
        assert!(!poll.done);
        assert!(poll.transcript.is_none());
        assert!(poll.raw.is_none());
    }

    #[tokio::test]
    async fn status_maps_completed_operations() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        server
            .mock("GET", "/v1/operations/op-2")
            .with_status(200)
            .with_body(
                json!({
                    "name": "op-2",
                    "done": true,
                    "response": {
                        "results": [
                            {"alternatives": [{"transcript": "Hello", "confidence": 0.8}]},
                            {"alternatives": [{"transcript": "world", "confidence": 0.6}]}
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let config = mock_provider_config(&server.url(), &[]);
        let poll = status(&config, "op-2").await.unwrap();
        assert!(poll.done);
        assert_eq!(poll.transcript.as_deref(), Some("Hello\nworld"));
        assert_eq!(poll.confidence, Some(0.7));
        assert!(poll.raw.is_some());
    }

    #[tokio::test]
    async fn await_completion_returns_a_transcript_once_done() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        server
            .mock("GET", "/v1/operations/op-3")
            .with_status(200)
            .with_body(
                json!({
                    "name": "op-3",
                    "done": true,
                    "response": {
                        "results": [{"alternatives": [{"transcript": "All done", "confidence": 0.9}]}]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let config = mock_provider_config(&server.url(), &[]);
        let conversation = Conversation::pending_upload(
            "gs://scribe-audio/audio/x.webm".to_string(),
            "en-US".to_string(),
        );
        let transcript = await_completion(
            &config,
            &conversation,
            "op-3",
            AwaitOptions {
                interval: Duration::from_millis(5),
                deadline: Duration::from_secs(5),
                cancel: CancellationToken::new(),
            },
        )
        .await
        .unwrap();

        assert_eq!(transcript.text, "All done");
        assert_eq!(transcript.conversation_id, conversation.id);
    }

    #[tokio::test]
    async fn await_completion_honors_cancellation() {
        let config = mock_provider_config("http://127.0.0.1:9", &[]);
        let conversation = Conversation::pending_upload(
            "gs://scribe-audio/audio/x.webm".to_string(),
            "en-US".to_string(),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        // Cancelled before the first poll: no HTTP call is ever made.
        let err = await_completion(
            &config,
            &conversation,
            "op-4",
            AwaitOptions {
                interval: Duration::from_secs(60),
                deadline: Duration::from_secs(120),
                cancel,
            },
        )
        .await
        .unwrap_err();
        assert!(err.message().contains("cancelled"));
    }

    #[tokio::test]
    async fn await_completion_expires_at_the_deadline() {
        let config = mock_provider_config("http://127.0.0.1:9", &[]);
        let conversation = Conversation::pending_upload(
            "gs://scribe-audio/audio/x.webm".to_string(),
            "en-US".to_string(),
        );

        // Zero deadline: the first tick trips expiry before any HTTP call.
        let err = await_completion(
            &config,
            &conversation,
            "op-5",
            AwaitOptions {
                interval: Duration::from_millis(1),
                deadline: Duration::ZERO,
                cancel: CancellationToken::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.message().contains("deadline"));
    }
}
