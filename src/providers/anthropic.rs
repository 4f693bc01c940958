//! Anthropic messages adapter.
//!
//! Speaks the `/v1/messages` endpoint with `x-api-key` authentication.
//! See: <https://docs.anthropic.com/en/api/messages>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::openai::map_reqwest_error;
use super::traits::{ProviderAdapter, classify_response};
use crate::types::CallOptions;
use crate::{Result, SkaldError};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic messages API.
#[derive(Clone)]
pub struct AnthropicAdapter {
    api_key: String,
    http: Client,
    base_url: String,
}

impl AnthropicAdapter {
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
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [MessageParam<'a>; 1],
}

#[derive(Serialize)]
struct MessageParam<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str, options: &CallOptions) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&MessagesRequest {
                model: &options.model,
                max_tokens: options.max_tokens,
                temperature: options.temperature,
                messages: [MessageParam {
                    role: "user",
                    content: prompt,
                }],
            })
            .send()
            .await
            .map_err(|e| map_reqwest_error(self.name(), e))?;

        let response = classify_response(self.name(), &options.model, response).await?;

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| SkaldError::Http(e.to_string()))?;

        let text: String = body
            .content
            .into_iter()
            .map(|block| block.text)
            .collect();

        if text.is_empty() {
            Err(SkaldError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}
