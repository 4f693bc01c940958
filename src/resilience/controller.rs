//! Resilient provider decorator.
//!
//! [`ResilientAdapter`] wraps a [`ProviderAdapter`] with three independent
//! layers, applied in order:
//!
//! 1. **token bucket** — reject immediately when empty, no network I/O;
//! 2. **circuit breaker** — reject while open; after cooldown one probe
//!    passes through and its outcome decides the next state;
//! 3. **retry loop** — transient failures back off and retry; permanent
//!    failures abort without consuming retry budget.
//!
//! The breaker records the final outcome of the whole retried call, so the
//! half-open probe remains exactly one admitted call with one
//! authoritative result. Calls that never reach the provider — a deadline
//! already expired, or a future dropped before the first attempt — record
//! nothing; an admitted probe in that situation releases its slot instead.
//! Local rejections (`Throttled`, `CircuitOpen`) are distinguishable from
//! provider failures via
//! [`SkaldError::is_rejection`](crate::SkaldError::is_rejection).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

use super::breaker::{Admission, BreakerConfig, CircuitBreaker, CircuitState};
use super::rate_limit::{RateLimitConfig, TokenBucket};
use super::retry::{RetryConfig, with_retry};
use crate::providers::ProviderAdapter;
use crate::telemetry;
use crate::types::CallOptions;
use crate::{Result, SkaldError};

/// Per-provider resilience configuration.
///
/// Providers differ in throughput and failure characteristics, so each
/// gets its own limiter, breaker, retry, and timeout settings.
#[derive(Debug, Clone, Default)]
pub struct ResilienceConfig {
    pub rate_limit: RateLimitConfig,
    pub breaker: BreakerConfig,
    pub retry: RetryConfig,
    /// Per-attempt timeout for the provider call. `None` relies on the
    /// HTTP client's own timeout.
    pub attempt_timeout: Option<Duration>,
}

impl ResilienceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    pub fn breaker(mut self, config: BreakerConfig) -> Self {
        self.breaker = config;
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }
}

/// Decorator applying rate limiting, circuit breaking, and retry to a
/// provider adapter.
pub struct ResilientAdapter {
    inner: Arc<dyn ProviderAdapter>,
    bucket: TokenBucket,
    breaker: CircuitBreaker,
    retry: RetryConfig,
    attempt_timeout: Option<Duration>,
}

impl ResilientAdapter {
    /// Wrap an adapter with the given resilience configuration.
    pub fn new(inner: Arc<dyn ProviderAdapter>, config: ResilienceConfig) -> Self {
        let name = inner.name().to_string();
        Self {
            bucket: TokenBucket::new(config.rate_limit),
            breaker: CircuitBreaker::new(name, config.breaker),
            retry: config.retry,
            attempt_timeout: config.attempt_timeout,
            inner,
        }
    }

    /// Name of the wrapped provider.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Current breaker state, for reporting.
    pub fn breaker_state(&self) -> CircuitState {
        self.breaker.state()
    }

    /// Call the provider through all three layers.
    ///
    /// `deadline`, when set, bounds the whole operation including retry
    /// sleeps and the in-flight request.
    pub async fn complete(
        &self,
        prompt: &str,
        options: &CallOptions,
        deadline: Option<Instant>,
    ) -> Result<String> {
        let provider = self.inner.name();

        if !self.bucket.try_acquire() {
            metrics::counter!(telemetry::THROTTLE_REJECTIONS_TOTAL,
                "provider" => provider.to_owned())
            .increment(1);
            return Err(SkaldError::Throttled {
                provider: provider.to_string(),
            });
        }

        if let Admission::Rejected(retry_in) = self.breaker.admit() {
            metrics::counter!(telemetry::BREAKER_REJECTIONS_TOTAL,
                "provider" => provider.to_owned())
            .increment(1);
            return Err(SkaldError::CircuitOpen {
                provider: provider.to_string(),
                retry_in,
            });
        }

        // If this future is dropped before an outcome is recorded, the
        // guard hands an admitted probe slot back to the breaker.
        let guard = ProbeGuard::new(&self.breaker);
        let attempted = AtomicBool::new(false);

        let start = Instant::now();
        let result = with_retry(&self.retry, provider, deadline, || {
            attempted.store(true, Ordering::Relaxed);
            self.attempt(prompt, options, deadline)
        })
        .await;

        let elapsed = start.elapsed();
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => provider.to_owned())
        .record(elapsed.as_secs_f64());
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => provider.to_owned(),
            "status" => if result.is_ok() { "ok" } else { "error" })
        .increment(1);

        // Only calls that reached the provider inform the breaker. A
        // deadline that expired before the first attempt is a local
        // outcome, not a provider failure.
        if attempted.load(Ordering::Relaxed) {
            match &result {
                Ok(_) => self.breaker.record_success(),
                Err(_) => self.breaker.record_failure(),
            }
            guard.disarm();
        }
        debug!(
            provider,
            ok = result.is_ok(),
            elapsed_ms = elapsed.as_millis() as u64,
            "provider call finished"
        );
        result
    }

    /// One attempt against the inner adapter, bounded by the per-attempt
    /// timeout and the remaining deadline budget.
    async fn attempt(
        &self,
        prompt: &str,
        options: &CallOptions,
        deadline: Option<Instant>,
    ) -> Result<String> {
        let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));
        let budget = match (self.attempt_timeout, remaining) {
            (Some(t), Some(r)) => Some(t.min(r)),
            (Some(t), None) => Some(t),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        };

        match budget {
            Some(limit) => tokio::time::timeout(limit, self.inner.complete(prompt, options))
                .await
                .map_err(|_| SkaldError::Timeout {
                    provider: self.inner.name().to_string(),
                })?,
            None => self.inner.complete(prompt, options).await,
        }
    }
}

/// Hands an admitted half-open probe slot back to the breaker unless an
/// outcome was recorded first. Dropping the call future mid-probe must not
/// leave the breaker half-open with no result ever arriving.
struct ProbeGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl<'a> ProbeGuard<'a> {
    fn new(breaker: &'a CircuitBreaker) -> Self {
        Self {
            breaker,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.release_probe();
        }
    }
}
