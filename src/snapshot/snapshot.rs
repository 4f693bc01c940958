//! Persisted component snapshot.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Durable record of what a component looked like the last time documents
/// were successfully generated for it.
///
/// Owned exclusively by the change detector; only written after a
/// generation succeeds, so the persisted state never claims credit for
/// unobserved output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    /// Component identifier.
    pub component: String,
    /// Component root directory at snapshot time.
    pub root: PathBuf,
    /// Relative file path → content fingerprint.
    pub file_hashes: BTreeMap<String, String>,
    /// Document type → fingerprint of the last generated output.
    pub generated: BTreeMap<String, String>,
    /// Number of files fingerprinted.
    pub file_count: usize,
    /// Total bytes across all fingerprinted files.
    pub total_bytes: u64,
    /// Unix timestamp (seconds) of the last update.
    pub updated_at: u64,
}

impl ComponentSnapshot {
    /// Build a snapshot from a freshly computed fingerprint map, with an
    /// empty generated-output map.
    pub fn new(
        component: impl Into<String>,
        root: impl Into<PathBuf>,
        file_hashes: BTreeMap<String, String>,
        total_bytes: u64,
    ) -> Self {
        Self {
            component: component.into(),
            root: root.into(),
            file_count: file_hashes.len(),
            file_hashes,
            generated: BTreeMap::new(),
            total_bytes,
            updated_at: unix_now(),
        }
    }
}

/// Current unix time in seconds. Clamped to zero for clocks before 1970.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// SHA-256 fingerprint of content, hex-encoded.
///
/// Stable across processes, which matters because fingerprints are
/// persisted and compared after restarts.
pub fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
