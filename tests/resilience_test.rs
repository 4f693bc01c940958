//! Tests for [`ResilientAdapter`] — rate limiter, circuit breaker, and
//! retry wired around a provider adapter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use skald::providers::ProviderAdapter;
use skald::resilience::{
    BreakerConfig, CircuitState, RateLimitConfig, ResilienceConfig, ResilientAdapter, RetryConfig,
};
use skald::types::CallOptions;
use skald::{Result, SkaldError};

// =========================================================================
// Mock adapters
// =========================================================================

/// Fails with a transient error for the first `failures` calls, then
/// succeeds.
struct FlakyAdapter {
    calls: AtomicU32,
    failures: u32,
}

impl FlakyAdapter {
    fn new(failures: u32) -> Self {
        Self {
            calls: AtomicU32::new(0),
            failures,
        }
    }
}

#[async_trait]
impl ProviderAdapter for FlakyAdapter {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn complete(&self, _prompt: &str, _options: &CallOptions) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err(SkaldError::Http("connection reset".into()))
        } else {
            Ok("generated text".to_string())
        }
    }
}

/// Always fails with a permanent error.
struct UnauthorizedAdapter {
    calls: AtomicU32,
}

#[async_trait]
impl ProviderAdapter for UnauthorizedAdapter {
    fn name(&self) -> &str {
        "unauthorized"
    }

    async fn complete(&self, _prompt: &str, _options: &CallOptions) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SkaldError::AuthenticationFailed {
            provider: "unauthorized".into(),
        })
    }
}

/// Never responds within any reasonable test budget.
struct HangingAdapter;

#[async_trait]
impl ProviderAdapter for HangingAdapter {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn complete(&self, _prompt: &str, _options: &CallOptions) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok("too late".to_string())
    }
}

/// Fails on the first call, hangs on the second, succeeds afterwards.
struct StutteringAdapter {
    calls: AtomicU32,
}

#[async_trait]
impl ProviderAdapter for StutteringAdapter {
    fn name(&self) -> &str {
        "stuttering"
    }

    async fn complete(&self, _prompt: &str, _options: &CallOptions) -> Result<String> {
        match self.calls.fetch_add(1, Ordering::SeqCst) {
            0 => Err(SkaldError::Http("connection reset".into())),
            1 => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok("too late".to_string())
            }
            _ => Ok("recovered".to_string()),
        }
    }
}

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig::new()
        .max_attempts(max_attempts)
        .initial_delay(Duration::from_millis(1))
}

fn generous_rate() -> RateLimitConfig {
    RateLimitConfig::new(1000.0, 1000.0)
}

// =========================================================================
// Retry behaviour
// =========================================================================

#[tokio::test]
async fn transient_failure_is_retried_to_success() {
    let inner = Arc::new(FlakyAdapter::new(2));
    let adapter = ResilientAdapter::new(
        inner.clone(),
        ResilienceConfig::new()
            .rate_limit(generous_rate())
            .retry(fast_retry(3)),
    );

    let result = adapter
        .complete("prompt", &CallOptions::default(), None)
        .await;

    assert_eq!(result.unwrap(), "generated text");
    assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_budget_is_bounded_by_max_attempts() {
    let inner = Arc::new(FlakyAdapter::new(u32::MAX));
    let adapter = ResilientAdapter::new(
        inner.clone(),
        ResilienceConfig::new()
            .rate_limit(generous_rate())
            .retry(fast_retry(3)),
    );

    let err = adapter
        .complete("prompt", &CallOptions::default(), None)
        .await
        .unwrap_err();

    assert!(err.is_transient());
    assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn permanent_error_is_not_retried() {
    let inner = Arc::new(UnauthorizedAdapter {
        calls: AtomicU32::new(0),
    });
    let adapter = ResilientAdapter::new(
        inner.clone(),
        ResilienceConfig::new()
            .rate_limit(generous_rate())
            .retry(fast_retry(5)),
    );

    let err = adapter
        .complete("prompt", &CallOptions::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SkaldError::AuthenticationFailed { .. }));
    assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
}

// =========================================================================
// Rate limiting
// =========================================================================

#[tokio::test]
async fn empty_bucket_rejects_without_calling_provider() {
    let inner = Arc::new(FlakyAdapter::new(0));
    let adapter = ResilientAdapter::new(
        inner.clone(),
        ResilienceConfig::new()
            // One token, negligible refill.
            .rate_limit(RateLimitConfig::new(0.001, 1.0))
            .retry(RetryConfig::disabled()),
    );

    adapter
        .complete("prompt", &CallOptions::default(), None)
        .await
        .unwrap();
    let err = adapter
        .complete("prompt", &CallOptions::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SkaldError::Throttled { .. }));
    assert!(err.is_rejection());
    assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
}

// =========================================================================
// Circuit breaker
// =========================================================================

#[tokio::test]
async fn repeated_failures_open_the_circuit() {
    let inner = Arc::new(FlakyAdapter::new(u32::MAX));
    let adapter = ResilientAdapter::new(
        inner.clone(),
        ResilienceConfig::new()
            .rate_limit(generous_rate())
            .breaker(BreakerConfig::new().failure_threshold(2))
            .retry(RetryConfig::disabled()),
    );

    for _ in 0..2 {
        let _ = adapter
            .complete("prompt", &CallOptions::default(), None)
            .await;
    }
    assert_eq!(adapter.breaker_state(), CircuitState::Open);

    // The open circuit rejects before the provider is reached.
    let calls_before = inner.calls.load(Ordering::SeqCst);
    let err = adapter
        .complete("prompt", &CallOptions::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SkaldError::CircuitOpen { .. }));
    assert_eq!(inner.calls.load(Ordering::SeqCst), calls_before);
}

#[tokio::test]
async fn circuit_recovers_after_cooldown_via_probe() {
    // Fails twice (opening the circuit), then succeeds.
    let inner = Arc::new(FlakyAdapter::new(2));
    let adapter = ResilientAdapter::new(
        inner.clone(),
        ResilienceConfig::new()
            .rate_limit(generous_rate())
            .breaker(
                BreakerConfig::new()
                    .failure_threshold(2)
                    .cooldown(Duration::from_millis(20)),
            )
            .retry(RetryConfig::disabled()),
    );

    for _ in 0..2 {
        let _ = adapter
            .complete("prompt", &CallOptions::default(), None)
            .await;
    }
    assert_eq!(adapter.breaker_state(), CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(50)).await;

    // The probe succeeds and the circuit closes.
    let result = adapter
        .complete("prompt", &CallOptions::default(), None)
        .await;
    assert!(result.is_ok());
    assert_eq!(adapter.breaker_state(), CircuitState::Closed);
}

#[tokio::test]
async fn abandoned_probe_frees_the_slot_for_the_next_caller() {
    let inner = Arc::new(StutteringAdapter {
        calls: AtomicU32::new(0),
    });
    let adapter = ResilientAdapter::new(
        inner.clone(),
        ResilienceConfig::new()
            .rate_limit(generous_rate())
            .breaker(
                BreakerConfig::new()
                    .failure_threshold(1)
                    .cooldown(Duration::from_millis(20)),
            )
            .retry(RetryConfig::disabled()),
    );

    let _ = adapter
        .complete("prompt", &CallOptions::default(), None)
        .await;
    assert_eq!(adapter.breaker_state(), CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(50)).await;

    // The admitted probe hangs and its future is dropped mid-flight.
    let options = CallOptions::default();
    let probe = adapter.complete("prompt", &options, None);
    let _ = tokio::time::timeout(Duration::from_millis(20), probe).await;
    assert_eq!(adapter.breaker_state(), CircuitState::Open);

    // The slot is free again; the next probe succeeds and closes the
    // circuit.
    let result = adapter
        .complete("prompt", &CallOptions::default(), None)
        .await;
    assert_eq!(result.unwrap(), "recovered");
    assert_eq!(adapter.breaker_state(), CircuitState::Closed);
}

// =========================================================================
// Timeouts and deadlines
// =========================================================================

#[tokio::test]
async fn attempt_timeout_bounds_a_hanging_provider() {
    let adapter = ResilientAdapter::new(
        Arc::new(HangingAdapter),
        ResilienceConfig::new()
            .rate_limit(generous_rate())
            .retry(RetryConfig::disabled())
            .attempt_timeout(Duration::from_millis(30)),
    );

    let start = Instant::now();
    let err = adapter
        .complete("prompt", &CallOptions::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SkaldError::Timeout { .. }));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn deadline_bounds_the_whole_operation_including_retries() {
    let inner = Arc::new(FlakyAdapter::new(u32::MAX));
    let adapter = ResilientAdapter::new(
        inner.clone(),
        ResilienceConfig::new()
            .rate_limit(generous_rate())
            .retry(
                RetryConfig::new()
                    .max_attempts(50)
                    .initial_delay(Duration::from_millis(40)),
            ),
    );

    let deadline = Instant::now() + Duration::from_millis(60);
    let err = adapter
        .complete("prompt", &CallOptions::default(), Some(deadline))
        .await
        .unwrap_err();

    assert!(matches!(err, SkaldError::Timeout { .. }));
    // Far fewer than 50 attempts fit inside the deadline.
    assert!(inner.calls.load(Ordering::SeqCst) < 5);
}

#[tokio::test]
async fn expired_deadline_does_not_count_against_the_breaker() {
    let inner = Arc::new(FlakyAdapter::new(0));
    let adapter = ResilientAdapter::new(
        inner.clone(),
        ResilienceConfig::new()
            .rate_limit(generous_rate())
            .breaker(BreakerConfig::new().failure_threshold(1))
            .retry(RetryConfig::disabled()),
    );

    // The deadline is already over; the provider is never contacted.
    let err = adapter
        .complete("prompt", &CallOptions::default(), Some(Instant::now()))
        .await
        .unwrap_err();

    assert!(matches!(err, SkaldError::Timeout { .. }));
    assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
    // A local timeout is not a provider failure.
    assert_eq!(adapter.breaker_state(), CircuitState::Closed);
}
