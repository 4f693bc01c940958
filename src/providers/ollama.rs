//! Ollama generate adapter.
//!
//! Speaks the non-streaming `/api/generate` endpoint of a local Ollama
//! server. No authentication.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::openai::map_reqwest_error;
use super::traits::{ProviderAdapter, classify_response};
use crate::types::CallOptions;
use crate::{Result, SkaldError};

/// Adapter for a local Ollama server.
#[derive(Clone)]
pub struct OllamaAdapter {
    http: Client,
    base_url: String,
}

impl OllamaAdapter {
    /// Create an adapter pointed at the given server URL
    /// (e.g. `http://localhost:11434`).
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateParams,
}

#[derive(Serialize)]
struct GenerateParams {
    num_predict: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, prompt: &str, options: &CallOptions) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&GenerateRequest {
                model: &options.model,
                prompt,
                stream: false,
                options: GenerateParams {
                    num_predict: options.max_tokens,
                    temperature: options.temperature,
                },
            })
            .send()
            .await
            .map_err(|e| map_reqwest_error(self.name(), e))?;

        let response = classify_response(self.name(), &options.model, response).await?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SkaldError::Http(e.to_string()))?;

        if body.response.is_empty() {
            Err(SkaldError::EmptyResponse)
        } else {
            Ok(body.response)
        }
    }
}
