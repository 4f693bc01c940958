//! Response caching.

mod key;
mod response;

pub use key::cache_key;
pub use response::{CacheConfig, CacheStats, ResponseCache};
