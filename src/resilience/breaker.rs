//! Circuit breaker per provider.
//!
//! Isolates a failing provider: after `failure_threshold` consecutive
//! failures the circuit opens and calls are rejected locally until
//! `cooldown` elapses. Then exactly one probe call is admitted (half-open);
//! its outcome is authoritative — success closes the circuit, failure
//! reopens it with a fresh cooldown. Calls arriving while the probe is in
//! flight are rejected. A probe abandoned without an outcome releases the
//! slot back to the open state.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{info, warn};

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls pass through.
    Closed,
    /// Rejecting calls until the cooldown elapses.
    Open,
    /// One probe call in flight; everyone else is rejected.
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,
    /// How long the circuit stays open before admitting a probe.
    pub cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(30),
        }
    }
}

impl BreakerConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the consecutive-failure threshold.
    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Set the open-state cooldown.
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }
}

struct BreakerInner {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

/// Per-provider failure isolation.
pub struct CircuitBreaker {
    name: String,
    config: BreakerConfig,
    inner: Mutex<BreakerInner>,
}

/// Outcome of asking the breaker for admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Call may proceed.
    Allowed,
    /// Circuit is open; retry no sooner than the contained duration.
    Rejected(Duration),
}

impl CircuitBreaker {
    /// Create a closed breaker for the named provider.
    pub fn new(name: impl Into<String>, config: BreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
        }
    }

    /// Provider this breaker guards.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    pub fn state(&self) -> CircuitState {
        self.inner.lock().unwrap().state
    }

    /// Current consecutive-failure count.
    pub fn consecutive_failures(&self) -> u32 {
        self.inner.lock().unwrap().consecutive_failures
    }

    /// Ask for admission. Transitions open → half-open when the cooldown
    /// has elapsed, admitting the caller as the single probe.
    pub fn admit(&self) -> Admission {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            CircuitState::Closed => Admission::Allowed,
            CircuitState::Open => {
                let elapsed = inner
                    .opened_at
                    .map(|t| t.elapsed())
                    .unwrap_or(Duration::ZERO);
                if elapsed >= self.config.cooldown {
                    inner.state = CircuitState::HalfOpen;
                    info!(provider = %self.name, "circuit half-open, admitting probe");
                    Admission::Allowed
                } else {
                    Admission::Rejected(self.config.cooldown - elapsed)
                }
            }
            // A probe is already in flight; its outcome will decide.
            CircuitState::HalfOpen => Admission::Rejected(self.config.cooldown),
        }
    }

    /// Record a successful call.
    pub fn record_success(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state != CircuitState::Closed {
            info!(provider = %self.name, from = %inner.state, "circuit closed");
        }
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }

    /// Release an admitted probe that never produced an outcome.
    ///
    /// Reverts half-open to open without restarting the cooldown, so the
    /// next caller can take the probe slot instead of being rejected
    /// until someone reports a result that never comes.
    pub fn release_probe(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state == CircuitState::HalfOpen {
            inner.state = CircuitState::Open;
            warn!(provider = %self.name, "probe abandoned, circuit reopened");
        }
    }

    /// Record a failed call.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    inner.state = CircuitState::Open;
                    inner.opened_at = Some(Instant::now());
                    warn!(
                        provider = %self.name,
                        failures = inner.consecutive_failures,
                        cooldown_ms = self.config.cooldown.as_millis() as u64,
                        "circuit opened"
                    );
                }
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                inner.opened_at = Some(Instant::now());
                warn!(provider = %self.name, "probe failed, circuit reopened");
            }
            CircuitState::Open => {}
        }
    }
}
