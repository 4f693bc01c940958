//! Skald error types

use std::time::Duration;

/// Skald error types.
///
/// Errors fall into three classes that drive control flow upstream:
///
/// - **transient** ([`is_transient()`](SkaldError::is_transient)) — worth
///   retrying: timeouts, connection failures, rate-limit responses,
///   server-side 5xx errors.
/// - **permanent** — surfaced immediately: bad credentials, malformed
///   requests, unknown models.
/// - **rejected before attempt** ([`is_rejection()`](SkaldError::is_rejection))
///   — the call never reached the network: circuit open, local rate limiter
///   empty, cache entry over budget. Callers can distinguish "the provider
///   failed" from "we chose not to call it".
#[derive(Debug, thiserror::Error)]
pub enum SkaldError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error from {provider} ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("rate limited by {provider}, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("request to {provider} timed out")]
    Timeout { provider: String },

    #[error("authentication failed for provider {provider}")]
    AuthenticationFailed { provider: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("empty response from model")]
    EmptyResponse,

    // Rejected-before-attempt errors
    #[error("circuit open for provider {provider}, retry in {retry_in:?}")]
    CircuitOpen { provider: String, retry_in: Duration },

    #[error("rate limiter empty for provider {provider}")]
    Throttled { provider: String },

    #[error("cache entry too large: {size} bytes exceeds budget of {budget}")]
    EntryTooLarge { size: u64, budget: u64 },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("no provider configured")]
    NoProvider,

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SkaldError {
    /// Whether this error is transient and worth retrying.
    ///
    /// Transient: network/HTTP failures, per-attempt timeouts, rate-limit
    /// responses, server errors (408/429/5xx), and empty responses.
    /// Everything else is permanent or a local rejection.
    pub fn is_transient(&self) -> bool {
        match self {
            SkaldError::Http(_)
            | SkaldError::RateLimited { .. }
            | SkaldError::Timeout { .. }
            | SkaldError::EmptyResponse => true,
            SkaldError::Api { status, .. } => {
                matches!(status, 408 | 429) || *status >= 500
            }
            _ => false,
        }
    }

    /// Whether this error is a local rejection, raised before any network
    /// attempt was made.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SkaldError::CircuitOpen { .. }
                | SkaldError::Throttled { .. }
                | SkaldError::EntryTooLarge { .. }
        )
    }

    /// Provider-supplied retry hint, if any.
    ///
    /// Only `RateLimited` errors carry one; the retry loop gives it
    /// precedence over the computed backoff delay.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SkaldError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for Skald operations
pub type Result<T> = std::result::Result<T, SkaldError>;
