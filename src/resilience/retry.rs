//! Retry configuration, delay calculation, and the shared retry helper.
//!
//! Transient errors (as classified by [`SkaldError::is_transient`]) are
//! retried with multiplicative backoff; permanent errors abort
//! immediately. An optional deadline interrupts both retry sleeps and the
//! whole operation.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::telemetry;
use crate::{Result, SkaldError};

/// Configuration for retry behaviour on transient errors.
///
/// ```rust
/// # use skald::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200))
///     .backoff_multiplier(1.5);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Delay before the first retry. Default: 500ms.
    pub initial_delay: Duration,
    /// Factor applied to the delay after each retry. Default: 2.0.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries (caps the growth). Default: 30s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    pub fn backoff_multiplier(mut self, factor: f64) -> Self {
        self.backoff_multiplier = factor;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculate the delay for a given attempt number (0-indexed):
    /// `initial_delay * multiplier^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let secs =
            self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }

    /// Calculate the effective delay, respecting provider `retry_after`
    /// hints: a hint from a `RateLimited` error takes precedence over the
    /// computed backoff (still capped at `max_delay`).
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after
            .map(|hint| hint.min(self.max_delay))
            .unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

/// Execute an async operation with retry logic.
///
/// Retries transient errors up to `config.max_attempts` total tries.
/// Permanent errors are returned immediately without consuming retry
/// budget. When a `deadline` is set, a sleep that would overshoot it is
/// skipped and the whole operation abandoned with a `Timeout`.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    provider: &str,
    deadline: Option<Instant>,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SkaldError::Timeout {
                provider: provider.to_string(),
            });
        }
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                if attempt + 1 < config.max_attempts {
                    let delay = config.effective_delay(attempt, e.retry_after());
                    if deadline.is_some_and(|d| Instant::now() + delay >= d) {
                        warn!(
                            provider,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "abandoning retries, deadline would elapse during backoff"
                        );
                        return Err(SkaldError::Timeout {
                            provider: provider.to_string(),
                        });
                    }
                    warn!(
                        provider,
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    metrics::counter!(telemetry::RETRIES_TOTAL,
                        "provider" => provider.to_owned())
                    .increment(1);
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e), // permanent error, no retry
        }
    }
    Err(last_err.unwrap_or(SkaldError::NoProvider))
}
