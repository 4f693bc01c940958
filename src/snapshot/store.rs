//! Durable snapshot storage.
//!
//! One JSON file holds every [`ComponentSnapshot`] by component name —
//! the sole durable state of this crate. Absence or corruption of the
//! file is treated as "no prior snapshots" (forcing full regeneration),
//! never as a fatal error. Persist failures are logged and non-fatal:
//! the in-memory map stays correct for the current process even when the
//! on-disk copy is stale.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::snapshot::ComponentSnapshot;

/// JSON-file-backed store of component snapshots.
///
/// The read-modify-write-persist sequence in [`commit`](Self::commit) is
/// serialized by the interior mutex, so concurrent regeneration of two
/// components cannot lose each other's updates.
pub struct SnapshotStore {
    path: PathBuf,
    snapshots: Mutex<HashMap<String, ComponentSnapshot>>,
}

impl SnapshotStore {
    /// Open a store backed by the given file, loading any existing
    /// snapshots. A missing or unparseable file yields an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let snapshots = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "snapshot file corrupt, starting with no prior snapshots"
                    );
                    HashMap::new()
                }
            },
            Err(e) => {
                debug!(
                    path = %path.display(),
                    error = %e,
                    "no snapshot file, starting fresh"
                );
                HashMap::new()
            }
        };
        Self {
            path,
            snapshots: Mutex::new(snapshots),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot for a component, if any.
    pub async fn get(&self, component: &str) -> Option<ComponentSnapshot> {
        self.snapshots.lock().await.get(component).cloned()
    }

    /// Record a successful generation.
    ///
    /// Merges the prior snapshot's generated-output fingerprints for
    /// *other* document types into `snapshot` (regenerating one document
    /// type never erases tracking for the rest), stores the fingerprint
    /// of the fresh output under `doc_type`, and rewrites the file.
    pub async fn commit(
        &self,
        mut snapshot: ComponentSnapshot,
        doc_type: &str,
        output_fingerprint: String,
    ) {
        let mut map = self.snapshots.lock().await;
        if let Some(prior) = map.get(&snapshot.component) {
            for (other, fp) in &prior.generated {
                snapshot
                    .generated
                    .entry(other.clone())
                    .or_insert_with(|| fp.clone());
            }
        }
        snapshot
            .generated
            .insert(doc_type.to_string(), output_fingerprint);
        map.insert(snapshot.component.clone(), snapshot);

        if let Err(e) = self.persist(&map).await {
            warn!(
                path = %self.path.display(),
                error = %e,
                "failed to persist snapshots, on-disk copy is stale"
            );
        }
    }

    /// Atomically rewrite the snapshot file (temp file + rename).
    async fn persist(&self, map: &HashMap<String, ComponentSnapshot>) -> std::io::Result<()> {
        let bytes = serde_json::to_vec_pretty(map)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
