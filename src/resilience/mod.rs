//! Per-provider failure isolation: rate limiting, circuit breaking, retry.

mod breaker;
mod controller;
mod rate_limit;
mod retry;

pub use breaker::{Admission, BreakerConfig, CircuitBreaker, CircuitState};
pub use controller::{ResilienceConfig, ResilientAdapter};
pub use rate_limit::{RateLimitConfig, TokenBucket};
pub use retry::RetryConfig;
