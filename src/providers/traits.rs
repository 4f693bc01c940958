//! Provider adapter contract.
//!
//! Every external AI API is reached through one implementing type of
//! [`ProviderAdapter`]. Adapters are deliberately thin: one outbound
//! request per invocation, no caching, no retrying — those concerns live
//! in the layers above ([`ResponseCache`](crate::cache::ResponseCache),
//! [`ResilientAdapter`](crate::resilience::ResilientAdapter)).
//!
//! Adapters must normalise provider errors into the [`SkaldError`]
//! taxonomy so upstream layers can reason about retryability without
//! provider knowledge: 401/403 → `AuthenticationFailed`, 400/422 →
//! `InvalidRequest`, 404 → `ModelNotFound`, 429 → `RateLimited` (with the
//! `retry-after` hint when present), everything else → `Api`.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::CallOptions;
use crate::{Result, SkaldError};

/// Uniform call contract over heterogeneous external AI APIs.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider name for routing, logging, and metric labels.
    fn name(&self) -> &str;

    /// Send one completion request and return the response text.
    async fn complete(&self, prompt: &str, options: &CallOptions) -> Result<String>;
}

/// Map a non-success HTTP response into the shared error taxonomy.
///
/// Shared by all HTTP adapters so the status → error mapping stays in one
/// place. Consumes the response body for the `Api` message.
pub(crate) async fn classify_response(
    provider: &str,
    model: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 | 403 => Err(SkaldError::AuthenticationFailed {
            provider: provider.to_string(),
        }),
        400 | 422 => {
            let body = response.text().await.unwrap_or_default();
            Err(SkaldError::InvalidRequest(body))
        }
        404 => Err(SkaldError::ModelNotFound(model.to_string())),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(SkaldError::RateLimited {
                provider: provider.to_string(),
                retry_after,
            })
        }
        code => {
            let body = response.text().await.unwrap_or_default();
            Err(SkaldError::Api {
                provider: provider.to_string(),
                status: code,
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            })
        }
    }
}
