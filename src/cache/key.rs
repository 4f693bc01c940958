//! Cache key fingerprinting.

use sha2::{Digest, Sha256};

/// Compute a deterministic cache key from everything that influences a
/// provider response.
///
/// SHA-256 rather than a per-process hasher so keys are stable across
/// restarts and could back a shared cache later. Fields are separated by a
/// NUL byte so `("ab", "c")` and `("a", "bc")` cannot collide.
pub fn cache_key(
    provider: &str,
    model: &str,
    prompt: &str,
    max_tokens: u32,
    temperature: f32,
) -> String {
    let mut hasher = Sha256::new();
    for field in [provider, model, prompt] {
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(max_tokens.to_le_bytes());
    hasher.update(temperature.to_bits().to_le_bytes());
    format!("{:x}", hasher.finalize())
}
