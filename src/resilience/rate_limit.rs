//! Token-bucket rate limiting.
//!
//! One bucket per provider. A call that finds the bucket empty is rejected
//! locally, without any network I/O, as [`SkaldError::Throttled`].

use std::sync::Mutex;
use std::time::Instant;

/// Token bucket configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Steady refill rate in tokens per second.
    pub refill_per_sec: f64,
    /// Burst capacity; the bucket starts full.
    pub burst: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            refill_per_sec: 2.0,
            burst: 10.0,
        }
    }
}

impl RateLimitConfig {
    /// Create a config with the given rate and burst.
    pub fn new(refill_per_sec: f64, burst: f64) -> Self {
        Self {
            refill_per_sec,
            burst,
        }
    }

    /// Convenience constructor for N requests per minute with a burst of
    /// one tenth of that (at least 1).
    pub fn per_minute(requests: u32) -> Self {
        let rate = f64::from(requests) / 60.0;
        Self {
            refill_per_sec: rate,
            burst: (f64::from(requests) / 10.0).max(1.0),
        }
    }
}

struct BucketInner {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket: allows bursts up to capacity, refilling at a steady rate.
pub struct TokenBucket {
    config: RateLimitConfig,
    inner: Mutex<BucketInner>,
}

impl TokenBucket {
    /// Create a full bucket.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            inner: Mutex::new(BucketInner {
                tokens: config.burst,
                last_refill: Instant::now(),
            }),
            config,
        }
    }

    /// Take one token if available. Returns `false` when the bucket is
    /// empty; the caller translates that into a `Throttled` rejection.
    pub fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        self.refill(&mut inner);
        if inner.tokens >= 1.0 {
            inner.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Tokens currently available (after refill).
    pub fn available(&self) -> f64 {
        let mut inner = self.inner.lock().unwrap();
        self.refill(&mut inner);
        inner.tokens
    }

    fn refill(&self, inner: &mut BucketInner) {
        let now = Instant::now();
        let elapsed = now.duration_since(inner.last_refill).as_secs_f64();
        inner.tokens = (inner.tokens + elapsed * self.config.refill_per_sec).min(self.config.burst);
        inner.last_refill = now;
    }
}
