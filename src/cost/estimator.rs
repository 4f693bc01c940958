//! Token count estimation.
//!
//! A character-ratio heuristic, not a real tokenizer. It only feeds
//! complexity classification and advisory cost figures, never billing
//! reconciliation, so relative accuracy is all that matters. A real
//! tokenizer could be swapped in without changing any caller.

/// Average characters per token after whitespace normalization.
///
/// Matches the common ~4 chars/token rule of thumb for English prose and
/// source code.
pub const CHARS_PER_TOKEN: f64 = 4.0;

/// Estimate the token count of a text.
///
/// Whitespace runs are normalized to single spaces first so formatting
/// (indentation, blank lines) doesn't inflate the estimate.
pub fn estimate_tokens(text: &str) -> u32 {
    let mut chars = 0usize;
    let mut in_whitespace = true;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                chars += 1;
                in_whitespace = true;
            }
        } else {
            chars += 1;
            in_whitespace = false;
        }
    }
    (chars as f64 / CHARS_PER_TOKEN).ceil() as u32
}
