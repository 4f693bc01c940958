//! Tests for [`RetryConfig`] delay calculation.

use std::time::Duration;

use skald::RetryConfig;

#[test]
fn defaults() {
    let config = RetryConfig::default();
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.initial_delay, Duration::from_millis(500));
    assert_eq!(config.backoff_multiplier, 2.0);
    assert_eq!(config.max_delay, Duration::from_secs(30));
}

#[test]
fn disabled_means_single_attempt() {
    assert_eq!(RetryConfig::disabled().max_attempts, 1);
}

#[test]
fn builder_setters() {
    let config = RetryConfig::new()
        .max_attempts(5)
        .initial_delay(Duration::from_millis(100))
        .backoff_multiplier(3.0)
        .max_delay(Duration::from_secs(10));
    assert_eq!(config.max_attempts, 5);
    assert_eq!(config.initial_delay, Duration::from_millis(100));
    assert_eq!(config.backoff_multiplier, 3.0);
    assert_eq!(config.max_delay, Duration::from_secs(10));
}

#[test]
fn delay_grows_multiplicatively() {
    let config = RetryConfig::new()
        .initial_delay(Duration::from_millis(100))
        .backoff_multiplier(2.0);

    assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
    assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
    assert_eq!(config.delay_for_attempt(2), Duration::from_millis(400));
    assert_eq!(config.delay_for_attempt(3), Duration::from_millis(800));
}

#[test]
fn delay_is_capped_at_max() {
    let config = RetryConfig::new()
        .initial_delay(Duration::from_secs(1))
        .backoff_multiplier(10.0)
        .max_delay(Duration::from_secs(5));

    assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
    assert_eq!(config.delay_for_attempt(1), Duration::from_secs(5));
    assert_eq!(config.delay_for_attempt(10), Duration::from_secs(5));
}

#[test]
fn retry_after_hint_overrides_backoff() {
    let config = RetryConfig::new()
        .initial_delay(Duration::from_millis(100))
        .max_delay(Duration::from_secs(10));

    let hinted = config.effective_delay(0, Some(Duration::from_secs(3)));
    assert_eq!(hinted, Duration::from_secs(3));

    let unhinted = config.effective_delay(0, None);
    assert_eq!(unhinted, Duration::from_millis(100));
}

#[test]
fn retry_after_hint_is_still_capped() {
    let config = RetryConfig::new().max_delay(Duration::from_secs(5));
    let delay = config.effective_delay(0, Some(Duration::from_secs(120)));
    assert_eq!(delay, Duration::from_secs(5));
}
