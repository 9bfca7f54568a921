//! Vertex AI client for single-shot generative model invocations.

use crate::gateway::gcp_auth::TokenProvider;
use crate::gateway::with_retries;
use async_trait::async_trait;
use log::*;
use scribe_ai::traits::generative::Provider;
use scribe_ai::types::generation::{GenerationRequest, GenerationResponse};
use scribe_ai::Error;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Vertex AI generative model client.
pub struct VertexClient {
    client: reqwest::Client,
    base_url: String,
    config: Config,
    token_provider: Arc<TokenProvider>,
}

impl VertexClient {
    pub fn new(config: &Config, token_provider: Arc<TokenProvider>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| {
                warn!("Failed to build vertex HTTP client: {:?}", e);
                Error::Other(Box::new(e))
            })?;
        Ok(Self {
            client,
            base_url: config.vertex_base_url(),
            config: config.clone(),
            token_provider,
        })
    }

    /// Client using the process-wide token cache.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(config, TokenProvider::shared())
    }

    fn model_endpoint(&self) -> Result<String, Error> {
        let project = self
            .config
            .gcp_project_id()
            .ok_or_else(|| Error::Configuration("GCP_PROJECT_ID is required".to_string()))?;
        Ok(format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url,
            project,
            self.config.vertex_location(),
            self.config.vertex_model(),
        ))
    }

    async fn bearer_token(&self) -> Result<String, Error> {
        self.token_provider
            .access_token(&self.config)
            .await
            .map_err(|e| Error::Authentication(e.message().to_string()))
    }
}

#[async_trait]
impl Provider for VertexClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, Error> {
        let token = self.bearer_token().await?;
        let url = self.model_endpoint()?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.user_text),
                }],
            }],
            system_instruction: request.system_instruction.map(|text| Content {
                role: None,
                parts: vec![Part { text: Some(text) }],
            }),
        };

        debug!("Invoking generative model {}", self.config.vertex_model());

        let response = with_retries(&self.config, "vertex:generateContent", || {
            let request = self.client.post(&url).bearer_auth(&token).json(&body);
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
            error!("Vertex API: {}", error_text);
            return Err(Error::Provider(error_text));
        }

        let reply: GenerateContentResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse vertex response: {:?}", e);
            Error::Deserialization("Invalid response from Vertex AI".to_string())
        })?;

        Ok(GenerationResponse {
            text: flatten_candidates(&reply),
            model: self.config.vertex_model().to_string(),
        })
    }

    fn provider_id(&self) -> &str {
        "vertex_gemini"
    }
}

/// Concatenates the text parts of every candidate, trimmed. Normalizes the
/// provider's candidate/part nesting into the flat reply the pipeline
/// operates on.
fn flatten_candidates(response: &GenerateContentResponse) -> String {
    let mut out = String::new();
    for candidate in &response.candidates {
        let Some(content) = &candidate.content else {
            continue;
        };
        for part in &content.parts {
            if let Some(text) = &part.text {
                out.push_str(text);
            }
        }
    }
    out.trim().to_string()
}
