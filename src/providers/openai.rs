//! OpenAI chat completions adapter.
//!
//! Speaks the `/v1/chat/completions` endpoint with Bearer authentication.
//! See: <https://platform.openai.com/docs/api-reference/chat>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::{ProviderAdapter, classify_response};
use crate::types::CallOptions;
use crate::{Result, SkaldError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Adapter for the OpenAI chat completions API.
#[derive(Clone)]
pub struct OpenAiAdapter {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenAiAdapter {
    /// Create a new adapter with the given API key.
    pub fn new(api_key: impl Into<String>, http: Client) -> Self {
        Self::with_base_url(api_key, http, DEFAULT_BASE_URL)
    }

    /// Create an adapter with a custom base URL (for testing with wiremock).
    pub fn with_base_url(
        api_key: impl Into<String>,
        http: Client,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, prompt: &str, options: &CallOptions) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ChatRequest {
                model: &options.model,
                messages: [ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                max_tokens: options.max_tokens,
                temperature: options.temperature,
            })
            .send()
            .await
            .map_err(|e| map_reqwest_error(self.name(), e))?;

        let response = classify_response(self.name(), &options.model, response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SkaldError::Http(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(SkaldError::EmptyResponse)
    }
}

/// Map a reqwest transport error, distinguishing timeouts.
pub(crate) fn map_reqwest_error(provider: &str, e: reqwest::Error) -> SkaldError {
    if e.is_timeout() {
        SkaldError::Timeout {
            provider: provider.to_string(),
        }
    } else {
        SkaldError::Http(e.to_string())
    }
}

/// Build the shared HTTP client with a per-provider timeout.
pub(crate) fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SkaldError::Configuration(format!("failed to build HTTP client: {e}")))
}
