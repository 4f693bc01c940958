//! Bounded, TTL-based response cache.
//!
//! One [`ResponseCache`] exists per provider namespace so a noisy provider
//! cannot evict another provider's entries. Entries are bounded twice: by
//! resident bytes and by entry count. When either budget would be
//! exceeded, strictly least-recently-used entries are evicted one at a
//! time until both hold. A write larger than the whole byte budget is
//! rejected outright rather than evicted into.
//!
//! Expiry is enforced lazily on `get` (an expired entry behaves as a miss
//! and is removed on the spot) and by a periodic [`sweep`](ResponseCache::sweep)
//! that removes only expired entries, never performing LRU eviction.
//!
//! # Concurrency
//!
//! The map lives behind one `std::sync::Mutex`; all counters are atomics
//! updated inside the critical section but readable outside it, so
//! [`stats`](ResponseCache::stats) never blocks a concurrent `get`/`insert`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::debug;

use crate::tasks::BackgroundTask;
use crate::telemetry;
use crate::{Result, SkaldError};

/// Fixed per-entry bookkeeping overhead added to the key + value size.
const ENTRY_OVERHEAD: u64 = 96;

/// Configuration for a response cache.
///
/// ```rust
/// # use skald::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_bytes(16 * 1024 * 1024)
///     .max_entries(5_000)
///     .ttl(Duration::from_secs(1800));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Total resident byte budget. Default: 64 MiB.
    pub max_bytes: u64,
    /// Entry count budget. Default: 10,000.
    pub max_entries: usize,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
    /// Interval between background expiry sweeps. Default: 60 seconds.
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_bytes: 64 * 1024 * 1024,
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resident byte budget.
    pub fn max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    /// Set the entry count budget.
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the background sweep interval.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// A single cached response.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    size: u64,
    expires_at: Instant,
    last_accessed: Instant,
    access_count: u64,
}

/// Point-in-time view of cache counters.
///
/// Produced by [`ResponseCache::stats`] from atomic loads; safe to call
/// from a metrics reporter while requests are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expired: u64,
    pub current_bytes: u64,
    pub entries: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache. 0.0 when no lookups yet.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Mean resident entry size in bytes. 0.0 when empty.
    pub fn avg_entry_size(&self) -> f64 {
        if self.entries == 0 {
            0.0
        } else {
            self.current_bytes as f64 / self.entries as f64
        }
    }
}

enum Lookup {
    Hit(String),
    Expired(u64),
    Miss,
}

/// Bounded LRU + TTL cache for provider responses.
pub struct ResponseCache {
    namespace: String,
    config: CacheConfig,
    inner: Mutex<LruCache<String, CacheEntry>>,
    bytes: AtomicU64,
    entries: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expired: AtomicU64,
}

impl ResponseCache {
    /// Create a cache for the given provider namespace.
    pub fn new(namespace: impl Into<String>, config: CacheConfig) -> Self {
        Self {
            namespace: namespace.into(),
            config,
            // Budgets are enforced manually so eviction is observable;
            // the LruCache itself never evicts.
            inner: Mutex::new(LruCache::unbounded()),
            bytes: AtomicU64::new(0),
            entries: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expired: AtomicU64::new(0),
        }
    }

    /// Provider namespace this cache serves.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Look up a cached response, refreshing its recency on a hit.
    ///
    /// An entry whose TTL has elapsed behaves as a miss even if no sweep
    /// has run yet, and is removed on the spot.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();

        let lookup = match inner.get_mut(key) {
            None => Lookup::Miss,
            Some(entry) if entry.expires_at <= now => Lookup::Expired(entry.size),
            Some(entry) => {
                entry.last_accessed = now;
                entry.access_count += 1;
                Lookup::Hit(entry.value.clone())
            }
        };

        match lookup {
            Lookup::Hit(value) => {
                drop(inner);
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(telemetry::CACHE_HITS_TOTAL,
                    "provider" => self.namespace.clone())
                .increment(1);
                Some(value)
            }
            Lookup::Expired(size) => {
                inner.pop(key);
                drop(inner);
                self.bytes.fetch_sub(size, Ordering::Relaxed);
                self.entries.fetch_sub(1, Ordering::Relaxed);
                self.expired.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(telemetry::CACHE_EXPIRED_TOTAL,
                    "provider" => self.namespace.clone())
                .increment(1);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL,
                    "provider" => self.namespace.clone())
                .increment(1);
                None
            }
            Lookup::Miss => {
                drop(inner);
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL,
                    "provider" => self.namespace.clone())
                .increment(1);
                None
            }
        }
    }

    /// Insert a response, evicting least-recently-used entries as needed.
    ///
    /// Returns [`SkaldError::EntryTooLarge`] if the entry alone exceeds
    /// the byte budget; nothing is evicted in that case.
    pub fn insert(&self, key: &str, value: &str) -> Result<()> {
        let size = key.len() as u64 + value.len() as u64 + ENTRY_OVERHEAD;
        if size > self.config.max_bytes {
            return Err(SkaldError::EntryTooLarge {
                size,
                budget: self.config.max_bytes,
            });
        }

        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();

        // Replacing an existing key frees its budget first.
        if let Some(old) = inner.pop(key) {
            self.bytes.fetch_sub(old.size, Ordering::Relaxed);
            self.entries.fetch_sub(1, Ordering::Relaxed);
        }

        while self.bytes.load(Ordering::Relaxed) + size > self.config.max_bytes
            || inner.len() >= self.config.max_entries
        {
            match inner.pop_lru() {
                Some((_, evicted)) => {
                    self.bytes.fetch_sub(evicted.size, Ordering::Relaxed);
                    self.entries.fetch_sub(1, Ordering::Relaxed);
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                    metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL,
                        "provider" => self.namespace.clone())
                    .increment(1);
                }
                None => break,
            }
        }

        inner.put(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                size,
                expires_at: now + self.config.ttl,
                last_accessed: now,
                access_count: 0,
            },
        );
        self.bytes.fetch_add(size, Ordering::Relaxed);
        self.entries.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Remove expired entries. Never performs LRU eviction.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();

        let expired_keys: Vec<String> = inner
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            if let Some(entry) = inner.pop(key) {
                self.bytes.fetch_sub(entry.size, Ordering::Relaxed);
                self.entries.fetch_sub(1, Ordering::Relaxed);
                self.expired.fetch_add(1, Ordering::Relaxed);
            }
        }
        drop(inner);

        let removed = expired_keys.len();
        if removed > 0 {
            metrics::counter!(telemetry::CACHE_EXPIRED_TOTAL,
                "provider" => self.namespace.clone())
            .increment(removed as u64);
            debug!(
                namespace = %self.namespace,
                removed,
                "cache sweep removed expired entries"
            );
        }
        removed
    }

    /// Read the current counters without touching the entry map.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            current_bytes: self.bytes.load(Ordering::Relaxed),
            entries: self.entries.load(Ordering::Relaxed),
        }
    }

    /// Start the periodic expiry sweeper for this cache.
    ///
    /// The returned handle owns the timer; call
    /// [`BackgroundTask::shutdown`] to stop it and join the in-flight
    /// sweep.
    pub fn spawn_sweeper(self: &std::sync::Arc<Self>) -> BackgroundTask {
        let cache = std::sync::Arc::clone(self);
        let interval = self.config.sweep_interval;
        BackgroundTask::spawn_periodic("cache-sweeper", interval, move || {
            cache.sweep();
        })
    }
}
