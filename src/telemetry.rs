//! Telemetry metric name constants.
//!
//! Centralised metric names for skald operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `skald_`. Counters end in `_total`, gauges
//! and histograms use meaningful units (e.g. `_bytes`, `_usd`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "openai", "anthropic", "ollama")
//! - `status` — outcome: "ok" or "error"
//! - `doc_type` — document type being generated

/// Total provider calls dispatched, after all local gates.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "skald_requests_total";

/// Provider call duration in seconds, including retries.
///
/// Labels: `provider`.
pub const REQUEST_DURATION_SECONDS: &str = "skald_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`.
pub const RETRIES_TOTAL: &str = "skald_retries_total";

/// Total response cache hits.
///
/// Labels: `provider`.
pub const CACHE_HITS_TOTAL: &str = "skald_cache_hits_total";

/// Total response cache misses.
///
/// Labels: `provider`.
pub const CACHE_MISSES_TOTAL: &str = "skald_cache_misses_total";

/// Total LRU evictions from the response cache.
///
/// Labels: `provider`.
pub const CACHE_EVICTIONS_TOTAL: &str = "skald_cache_evictions_total";

/// Total entries removed because their TTL elapsed (sweep or lazy removal).
///
/// Labels: `provider`.
pub const CACHE_EXPIRED_TOTAL: &str = "skald_cache_expired_total";

/// Current resident bytes in the response cache.
///
/// Labels: `provider`.
pub const CACHE_SIZE_BYTES: &str = "skald_cache_size_bytes";

/// Current entry count in the response cache.
///
/// Labels: `provider`.
pub const CACHE_ENTRIES: &str = "skald_cache_entries";

/// Circuit breaker state: 0 = closed, 1 = half-open, 2 = open.
///
/// Labels: `provider`.
pub const BREAKER_STATE: &str = "skald_breaker_state";

/// Total calls rejected because the circuit was open.
///
/// Labels: `provider`.
pub const BREAKER_REJECTIONS_TOTAL: &str = "skald_breaker_rejections_total";

/// Total calls rejected by the local token bucket.
///
/// Labels: `provider`.
pub const THROTTLE_REJECTIONS_TOTAL: &str = "skald_throttle_rejections_total";

/// Total generations skipped by change detection.
///
/// Labels: `doc_type`.
pub const GENERATIONS_SKIPPED_TOTAL: &str = "skald_generations_skipped_total";

/// Estimated pre-call cost in USD (advisory, per planned generation).
///
/// Labels: `provider`.
pub const ESTIMATED_COST_USD: &str = "skald_estimated_cost_usd";
