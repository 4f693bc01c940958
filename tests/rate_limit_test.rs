//! Tests for [`TokenBucket`] rate limiting.

use std::thread::sleep;
use std::time::Duration;

use skald::resilience::{RateLimitConfig, TokenBucket};

#[test]
fn rate_limit_config_defaults() {
    let config = RateLimitConfig::default();
    assert_eq!(config.refill_per_sec, 2.0);
    assert_eq!(config.burst, 10.0);
}

#[test]
fn per_minute_converts_to_rate_and_burst() {
    let config = RateLimitConfig::per_minute(60);
    assert!((config.refill_per_sec - 1.0).abs() < 1e-9);
    assert!((config.burst - 6.0).abs() < 1e-9);

    // Burst never drops below one token.
    let small = RateLimitConfig::per_minute(3);
    assert_eq!(small.burst, 1.0);
}

#[test]
fn bucket_starts_full_and_allows_burst() {
    let bucket = TokenBucket::new(RateLimitConfig::new(1.0, 3.0));

    assert!(bucket.try_acquire());
    assert!(bucket.try_acquire());
    assert!(bucket.try_acquire());
    assert!(!bucket.try_acquire(), "burst capacity exhausted");
}

#[test]
fn empty_bucket_refills_over_time() {
    // 100 tokens/sec, so a 50ms wait is worth ~5 tokens.
    let bucket = TokenBucket::new(RateLimitConfig::new(100.0, 2.0));
    assert!(bucket.try_acquire());
    assert!(bucket.try_acquire());
    assert!(!bucket.try_acquire());

    sleep(Duration::from_millis(50));
    assert!(bucket.try_acquire());
}

#[test]
fn refill_is_capped_at_burst() {
    let bucket = TokenBucket::new(RateLimitConfig::new(1000.0, 2.0));
    sleep(Duration::from_millis(20));

    // Plenty of refill time, still only two tokens.
    assert!(bucket.available() <= 2.0);
    assert!(bucket.try_acquire());
    assert!(bucket.try_acquire());
    assert!(!bucket.try_acquire());
}

#[test]
fn available_reports_remaining_tokens() {
    let bucket = TokenBucket::new(RateLimitConfig::new(0.001, 5.0));
    assert!(bucket.try_acquire());
    assert!(bucket.try_acquire());

    let available = bucket.available();
    assert!((2.9..=3.1).contains(&available), "got {available}");
}
