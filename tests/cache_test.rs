//! Tests for [`ResponseCache`] — bounded LRU + TTL cache for provider
//! responses.

use std::thread::sleep;
use std::time::Duration;

use skald::cache::{CacheConfig, ResponseCache};

// Entry size is key + value + a fixed 96-byte overhead; tests use keys
// and values sized so the arithmetic stays obvious.
const OVERHEAD: u64 = 96;

fn cache_with(config: CacheConfig) -> ResponseCache {
    ResponseCache::new("test", config)
}

// =========================================================================
// CacheConfig
// =========================================================================

#[test]
fn cache_config_defaults() {
    let config = CacheConfig::default();
    assert_eq!(config.max_bytes, 64 * 1024 * 1024);
    assert_eq!(config.max_entries, 10_000);
    assert_eq!(config.ttl, Duration::from_secs(3600));
    assert_eq!(config.sweep_interval, Duration::from_secs(60));
}

#[test]
fn cache_config_builder() {
    let config = CacheConfig::new()
        .max_bytes(1024)
        .max_entries(500)
        .ttl(Duration::from_secs(60))
        .sweep_interval(Duration::from_secs(5));
    assert_eq!(config.max_bytes, 1024);
    assert_eq!(config.max_entries, 500);
    assert_eq!(config.ttl, Duration::from_secs(60));
    assert_eq!(config.sweep_interval, Duration::from_secs(5));
}

// =========================================================================
// Basic get/insert
// =========================================================================

#[test]
fn miss_then_hit() {
    let cache = cache_with(CacheConfig::default());

    assert!(cache.get("k1").is_none());
    cache.insert("k1", "response text").unwrap();
    assert_eq!(cache.get("k1").as_deref(), Some("response text"));

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
}

#[test]
fn replacing_a_key_keeps_one_entry() {
    let cache = cache_with(CacheConfig::default());

    cache.insert("k1", "first").unwrap();
    cache.insert("k1", "second").unwrap();

    assert_eq!(cache.get("k1").as_deref(), Some("second"));
    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(
        stats.current_bytes,
        "k1".len() as u64 + "second".len() as u64 + OVERHEAD
    );
}

#[test]
fn byte_accounting_tracks_inserts() {
    let cache = cache_with(CacheConfig::default());

    cache.insert("a", "xxxx").unwrap();
    cache.insert("b", "yyyyyyyy").unwrap();

    let stats = cache.stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.current_bytes, (1 + 4 + OVERHEAD) + (1 + 8 + OVERHEAD));
}

// =========================================================================
// Budgets and eviction
// =========================================================================

#[test]
fn byte_budget_evicts_least_recently_used() {
    // Each entry is 1 + 50 + 96 = 147 bytes; two fit in 300, three do not.
    let cache = cache_with(CacheConfig::new().max_bytes(300));
    let value = "v".repeat(50);

    cache.insert("a", &value).unwrap();
    cache.insert("b", &value).unwrap();
    cache.insert("c", &value).unwrap();

    assert!(cache.get("a").is_none(), "oldest entry should be evicted");
    assert!(cache.get("b").is_some());
    assert!(cache.get("c").is_some());

    let stats = cache.stats();
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.entries, 2);
    assert!(stats.current_bytes <= 300);
}

#[test]
fn entry_budget_evicts_least_recently_used() {
    let cache = cache_with(CacheConfig::new().max_entries(2));

    cache.insert("a", "1").unwrap();
    cache.insert("b", "2").unwrap();
    cache.insert("c", "3").unwrap();

    assert!(cache.get("a").is_none());
    assert!(cache.get("b").is_some());
    assert!(cache.get("c").is_some());
    assert_eq!(cache.stats().entries, 2);
}

#[test]
fn hit_refreshes_recency() {
    let cache = cache_with(CacheConfig::new().max_entries(2));

    cache.insert("a", "1").unwrap();
    cache.insert("b", "2").unwrap();
    // Touch "a" so "b" becomes the LRU victim.
    assert!(cache.get("a").is_some());
    cache.insert("c", "3").unwrap();

    assert!(cache.get("a").is_some());
    assert!(cache.get("b").is_none());
    assert!(cache.get("c").is_some());
}

#[test]
fn oversized_entry_is_rejected_not_evicted_into() {
    let cache = cache_with(CacheConfig::new().max_bytes(200));
    cache.insert("keep", "small").unwrap();

    let huge = "x".repeat(500);
    let err = cache.insert("big", &huge).unwrap_err();
    assert!(err.is_rejection());

    // The existing entry survived and no eviction was counted.
    assert!(cache.get("keep").is_some());
    let stats = cache.stats();
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.entries, 1);
}

// =========================================================================
// TTL expiry
// =========================================================================

#[test]
fn expired_entry_is_a_miss_before_any_sweep() {
    let cache = cache_with(CacheConfig::new().ttl(Duration::from_millis(20)));
    cache.insert("k", "v").unwrap();
    sleep(Duration::from_millis(50));

    assert!(cache.get("k").is_none());
    let stats = cache.stats();
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.entries, 0);
    assert_eq!(stats.current_bytes, 0);
}

#[test]
fn sweep_removes_only_expired_entries() {
    let cache = cache_with(CacheConfig::new().ttl(Duration::from_millis(20)));
    cache.insert("old1", "v").unwrap();
    cache.insert("old2", "v").unwrap();
    sleep(Duration::from_millis(50));

    assert_eq!(cache.sweep(), 2);
    assert_eq!(cache.stats().entries, 0);

    // A fresh entry survives a sweep.
    cache.insert("fresh", "v").unwrap();
    assert_eq!(cache.sweep(), 0);
    assert!(cache.get("fresh").is_some());
}

// =========================================================================
// Stats
// =========================================================================

#[test]
fn hit_ratio_reflects_traffic() {
    let cache = cache_with(CacheConfig::default());
    cache.insert("k", "v").unwrap();

    cache.get("k");
    cache.get("k");
    cache.get("absent");

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_ratio() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn avg_entry_size_is_zero_when_empty() {
    let cache = cache_with(CacheConfig::default());
    assert_eq!(cache.stats().avg_entry_size(), 0.0);
}

// =========================================================================
// Background sweeper
// =========================================================================

#[tokio::test]
async fn sweeper_removes_expired_entries() {
    let cache = std::sync::Arc::new(cache_with(
        CacheConfig::new()
            .ttl(Duration::from_millis(20))
            .sweep_interval(Duration::from_millis(25)),
    ));
    cache.insert("k", "v").unwrap();

    let sweeper = cache.spawn_sweeper();
    tokio::time::sleep(Duration::from_millis(120)).await;
    sweeper.shutdown().await;

    let stats = cache.stats();
    assert_eq!(stats.entries, 0);
    assert_eq!(stats.expired, 1);
    // The entry was removed by sweep, not by a lookup.
    assert_eq!(stats.misses, 0);
}
