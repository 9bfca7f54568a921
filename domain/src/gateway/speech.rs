//! Google Speech-to-Text client for long-running recognition jobs.
//!
//! Starting a job returns only the opaque operation name; completion is
//! observed by polling the operations endpoint. There is no webhook and no
//! cancellation of a started job.

use crate::gateway::gcp_auth::TokenProvider;
use crate::gateway::with_retries;
use async_trait::async_trait;
use log::*;
use scribe_ai::traits::speech::Provider;
use scribe_ai::types::recognition::{
    PollOutcome, RecognitionConfig, RecognitionOutcome, SegmentAlternative,
};
use scribe_ai::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::config::Config;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LongRunningRecognizeRequest {
    config: ApiRecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRecognitionConfig {
    language_code: String,
    model: String,
    use_enhanced: bool,
    enable_automatic_punctuation: bool,
    enable_speaker_diarization: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    diarization_speaker_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_contexts: Option<Vec<SpeechContext>>,
    encoding: &'static str,
    sample_rate_hertz: u32,
}

#[derive(Debug, Serialize)]
struct SpeechContext {
    phrases: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct OperationHandle {
    name: String,
}

/// Speech-to-Text API client.
pub struct SpeechClient {
    client: reqwest::Client,
    base_url: String,
    config: Config,
    token_provider: Arc<TokenProvider>,
}

impl SpeechClient {
    pub fn new(config: &Config, token_provider: Arc<TokenProvider>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| {
                warn!("Failed to build speech HTTP client: {:?}", e);
                Error::Other(Box::new(e))
            })?;
        Ok(Self {
            client,
            base_url: config.speech_base_url().to_string(),
            config: config.clone(),
            token_provider,
        })
    }

    /// Client using the process-wide token cache.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(config, TokenProvider::shared())
    }

    async fn bearer_token(&self) -> Result<String, Error> {
        self.token_provider
            .access_token(&self.config)
            .await
            .map_err(|e| Error::Authentication(e.message().to_string()))
    }

    fn build_request(recognition_config: &RecognitionConfig) -> LongRunningRecognizeRequest {
        let speaker_count = if recognition_config.enable_diarization {
            Some(recognition_config.speaker_count)
        } else {
            None
        };
        let speech_contexts = if recognition_config.phrase_hints.is_empty() {
            None
        } else {
            Some(vec![SpeechContext {
                phrases: recognition_config.phrase_hints.clone(),
            }])
        };
        LongRunningRecognizeRequest {
            config: ApiRecognitionConfig {
                language_code: recognition_config.language_code.clone(),
                model: recognition_config.model.clone(),
                use_enhanced: true,
                enable_automatic_punctuation: true,
                enable_speaker_diarization: recognition_config.enable_diarization,
                diarization_speaker_count: speaker_count,
                speech_contexts,
                encoding: recognition_config.encoding.as_api_tag(),
                sample_rate_hertz: recognition_config.sample_rate_hertz,
            },
            audio: RecognitionAudio {
                uri: recognition_config.media_uri.clone(),
            },
        }
    }
}

#[async_trait]
impl Provider for SpeechClient {
    async fn start_recognition(
        &self,
        recognition_config: RecognitionConfig,
    ) -> Result<String, Error> {
        let token = self.bearer_token().await?;
        let url = format!("{}/v1/speech:longrunningrecognize", self.base_url);
        let body = Self::build_request(&recognition_config);

        debug!(
            "Starting long-running recognition for {} ({})",
            recognition_config.media_uri,
            recognition_config.encoding.as_api_tag()
        );

        let response = with_retries(&self.config, "speech:longrunningrecognize", || {
            let request = self.client.post(&url).bearer_auth(&token).json(&body);
            async move {
                request
                    .send()
                    .await
                    .map_err(|e| Error::Network(e.to_string()))
            }
        })
        .await
        .map_err(|e| {
            warn!("Failed to start recognition: {:?}", e);
            e
        })?;

        if response.status().is_success() {
            let operation: OperationHandle = response.json().await.map_err(|e| {
                warn!("Failed to parse recognition response: {:?}", e);
                Error::Deserialization("Invalid response from speech API".to_string())
            })?;
            info!("Started recognition operation: {}", operation.name);
            Ok(operation.name)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Speech API: {}", error_text);
            Err(Error::Provider(error_text))
        }
    }

    async fn poll_recognition(&self, operation_name: &str) -> Result<PollOutcome, Error> {
        let token = self.bearer_token().await?;
        let url = format!(
            "{}/v1/operations/{}",
            self.base_url,
            urlencoding::encode(operation_name)
        );

        let response = with_retries(&self.config, "speech:operations.get", || {
            let request = self.client.get(&url).bearer_auth(&token);
            async move {
                request
                    .send()
                    .await
                    .map_err(|e| Error::Network(e.to_string()))
            }
        })
        .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Speech API: {}", error_text);
            return Err(Error::Provider(error_text));
        }

        let operation: Value = response.json().await.map_err(|e| {
            warn!("Failed to parse operation response: {:?}", e);
            Error::Deserialization("Invalid response from speech API".to_string())
        })?;

        if let Some(op_error) = operation.get("error") {
            let message = op_error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Recognition operation failed")
                .to_string();
            error!("Recognition operation {}: {}", operation_name, message);
            return Err(Error::Provider(message));
        }

        let done = operation
            .get("done")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !done {
            return Ok(PollOutcome::pending(Value::Null));
        }

        let raw = operation.get("response").cloned().unwrap_or(Value::Null);
        let alternatives = best_alternatives(&raw);
        let outcome = RecognitionOutcome::from_alternatives(&alternatives);
        Ok(PollOutcome::completed(outcome, raw))
    }

    fn provider_id(&self) -> &str {
        "google_stt"
    }
}

/// Pulls the best (first) alternative out of every result segment, in
/// provider-returned order.
fn best_alternatives(response: &Value) -> Vec<SegmentAlternative> {
    let Some(results) = response.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };
    results
        .iter()
        .filter_map(|result| result.get("alternatives").and_then(Value::as_array))
        .filter_map(|alternatives| alternatives.first())
        .map(|alternative| SegmentAlternative {
            transcript: alternative
                .get("transcript")
                .and_then(Value::as_str)
                .map(str::to_string),
            confidence: alternative.get("confidence").and_then(Value::as_f64),
        })
        .collect()
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
    async fn start_recognition_returns_the_operation_name() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let mock = server
            .mock("POST", "/v1/speech:longrunningrecognize")
            .match_header("authorization", "Bearer test-token")
            .match_body(mockito::Matcher::PartialJson(json!({
                "config": {
                    "languageCode": "en-US",
                    "model": "medical_conversation",
                    "useEnhanced": true,
                    "enableAutomaticPunctuation": true,
                    "enableSpeakerDiarization": true,
                    "diarizationSpeakerCount": 2,
                    "encoding": "WEBM_OPUS",
                    "sampleRateHertz": 48000
                },
                "audio": {"uri": "gs://scribe-audio/audio/x.webm"}
            })))
            .with_status(200)
            .with_body(json!({"name": "8042970698005776279"}).to_string())
            .create_async()
            .await;

        let config = mock_provider_config(&server.url(), &[]);
        let client = SpeechClient::new(&config, Arc::new(TokenProvider::new())).unwrap();

        let operation = client
            .start_recognition(RecognitionConfig::medical_conversation(
                "gs://scribe-audio/audio/x.webm",
                "en-US",
            ))
            .await
            .unwrap();

        assert_eq!(operation, "8042970698005776279");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn ogg_uris_are_tagged_ogg_opus() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let mock = server
            .mock("POST", "/v1/speech:longrunningrecognize")
            .match_body(mockito::Matcher::PartialJson(json!({
                "config": {"encoding": "OGG_OPUS"}
            })))
            .with_status(200)
            .with_body(json!({"name": "op-ogg"}).to_string())
            .create_async()
            .await;

        let config = mock_provider_config(&server.url(), &[]);
        let client = SpeechClient::new(&config, Arc::new(TokenProvider::new())).unwrap();

        client
            .start_recognition(RecognitionConfig::medical_conversation(
                "gs://scribe-audio/audio/x.OGG",
                "en-US",
            ))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn pending_operations_poll_as_not_done() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let mock = server
            .mock("GET", "/v1/operations/op-1")
            .with_status(200)
            .with_body(json!({"name": "op-1", "metadata": {"progressPercent": 40}}).to_string())
            .expect(2)
            .create_async()
            .await;

        let config = mock_provider_config(&server.url(), &[]);
        let client = SpeechClient::new(&config, Arc::new(TokenProvider::new())).unwrap();

        // Polling is a pure read; repeated calls agree and have no side effects.
        for _ in 0..2 {
            let poll = client.poll_recognition("op-1").await.unwrap();
            assert!(!poll.done);
            assert!(poll.outcome.is_none());
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn completed_operations_aggregate_transcripts() {
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
                            {"alternatives": [{"transcript": "world", "confidence": 0.6}]},
                            {"alternatives": [{"transcript": "again"}]}
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let config = mock_provider_config(&server.url(), &[]);
        let client = SpeechClient::new(&config, Arc::new(TokenProvider::new())).unwrap();

        let poll = client.poll_recognition("op-2").await.unwrap();
        assert!(poll.done);
        let outcome = poll.outcome.unwrap();
        assert_eq!(outcome.transcript, "Hello\nworld\nagain");
        assert_eq!(outcome.confidence, Some(0.7));
        // raw passes the provider response through untouched
        assert_eq!(
            poll.raw["results"][0]["alternatives"][0]["transcript"],
            "Hello"
        );
    }

    #[tokio::test]
    async fn operation_errors_surface_as_provider_errors() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        server
            .mock("GET", "/v1/operations/op-3")
            .with_status(200)
            .with_body(
                json!({
                    "name": "op-3",
                    "done": true,
                    "error": {"code": 3, "message": "Audio sample rate mismatch"}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let config = mock_provider_config(&server.url(), &[]);
        let client = SpeechClient::new(&config, Arc::new(TokenProvider::new())).unwrap();

        let err = client.poll_recognition("op-3").await.unwrap_err();
        assert!(matches!(err, Error::Provider(ref msg) if msg.contains("sample rate")));
    }
}
