//! Change detection.
//!
//! Decides, before any provider machinery runs, whether regenerating a
//! document is necessary at all: fingerprints the component's files,
//! diffs against the persisted snapshot, and checks whether the document
//! type has ever been generated (and still exists on disk).

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::snapshot::{ComponentSnapshot, fingerprint};
use super::store::SnapshotStore;
use crate::Result;
use crate::types::Component;

/// Advisory average size of one generated document, in tokens.
const AVG_TOKENS_PER_DOCUMENT: u64 = 2_000;

/// Advisory blended price (USD per 1K tokens) for savings figures.
const SAVINGS_PRICE_PER_1K: f64 = 0.01;

/// Advisory report of how much work change detection would skip.
///
/// For planning and reporting only — never used to gate actual calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub total_documents: u32,
    pub skipped_documents: u32,
    pub estimated_tokens_saved: u64,
    pub estimated_cost_saved: f64,
}

/// Fingerprints component content and diffs it against persisted
/// snapshots.
pub struct ChangeDetector {
    store: Arc<SnapshotStore>,
}

impl ChangeDetector {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Whether the component's files differ from the last snapshot.
    ///
    /// Returns the decision plus human-readable reasons naming each
    /// added, removed, or modified file. A component with no prior
    /// snapshot is always "changed".
    pub async fn has_changed(&self, component: &Component) -> Result<(bool, Vec<String>)> {
        let (current, _) = self.fingerprint_files(component).await?;

        let Some(prior) = self.store.get(&component.name).await else {
            return Ok((true, vec!["no prior snapshot".to_string()]));
        };

        let mut reasons = Vec::new();
        for (path, hash) in &current {
            match prior.file_hashes.get(path) {
                None => reasons.push(format!("added: {path}")),
                Some(old) if old != hash => reasons.push(format!("modified: {path}")),
                Some(_) => {}
            }
        }
        for path in prior.file_hashes.keys() {
            if !current.contains_key(path) {
                reasons.push(format!("removed: {path}"));
            }
        }

        Ok((!reasons.is_empty(), reasons))
    }

    /// Whether a document of `doc_type` needs regenerating.
    ///
    /// True when the component changed, when this document type has never
    /// been generated, or when the previously generated output file is
    /// missing from disk. Otherwise false.
    pub async fn should_regenerate(
        &self,
        component: &Component,
        doc_type: &str,
        output_path: Option<&Path>,
    ) -> Result<(bool, String)> {
        let (changed, reasons) = self.has_changed(component).await?;
        if changed {
            return Ok((true, reasons.join(", ")));
        }

        // has_changed returned false, so a prior snapshot exists.
        let snapshot = self.store.get(&component.name).await;
        let generated = snapshot
            .as_ref()
            .is_some_and(|s| s.generated.contains_key(doc_type));
        if !generated {
            return Ok((true, format!("{doc_type} never generated")));
        }

        if let Some(path) = output_path
            && tokio::fs::metadata(path).await.is_err()
        {
            return Ok((true, format!("output missing: {}", path.display())));
        }

        Ok((false, "up to date".to_string()))
    }

    /// Record a successful generation: recompute the component's file
    /// fingerprints, fingerprint the generated content under `doc_type`,
    /// and persist. Fingerprints for other document types are preserved.
    pub async fn update_snapshot(
        &self,
        component: &Component,
        doc_type: &str,
        generated_content: &str,
    ) -> Result<()> {
        let (file_hashes, total_bytes) = self.fingerprint_files(component).await?;
        let snapshot = ComponentSnapshot::new(
            component.name.clone(),
            component.root.clone(),
            file_hashes,
            total_bytes,
        );
        let output_fp = fingerprint(generated_content.as_bytes());
        self.store.commit(snapshot, doc_type, output_fp).await;
        debug!(
            component = %component.name,
            doc_type,
            "snapshot updated"
        );
        Ok(())
    }

    /// Estimate how much generation work the current snapshots would
    /// skip across the given components and document types.
    ///
    /// Advisory only; the figure multiplies skipped pairs by an average
    /// document size and a blended default price.
    pub async fn estimate_savings(
        &self,
        components: &[Component],
        doc_types: &[&str],
    ) -> Result<SavingsEstimate> {
        let mut skipped = 0u32;
        let mut total = 0u32;
        for component in components {
            for doc_type in doc_types {
                total += 1;
                let (needed, _) = self.should_regenerate(component, doc_type, None).await?;
                if !needed {
                    skipped += 1;
                }
            }
        }
        let tokens = u64::from(skipped) * AVG_TOKENS_PER_DOCUMENT;
        Ok(SavingsEstimate {
            total_documents: total,
            skipped_documents: skipped,
            estimated_tokens_saved: tokens,
            estimated_cost_saved: tokens as f64 / 1000.0 * SAVINGS_PRICE_PER_1K,
        })
    }

    /// Fingerprint every file in the component, keyed by its relative
    /// path. Also returns the total byte size.
    ///
    /// A listed file that no longer exists is left out of the map, so the
    /// diff against the prior snapshot reports it as removed.
    async fn fingerprint_files(
        &self,
        component: &Component,
    ) -> Result<(BTreeMap<String, String>, u64)> {
        let mut hashes = BTreeMap::new();
        let mut total_bytes = 0u64;
        for file in &component.files {
            let content = match tokio::fs::read(component.resolve(file)).await {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            total_bytes += content.len() as u64;
            hashes.insert(file.to_string_lossy().into_owned(), fingerprint(&content));
        }
        Ok((hashes, total_bytes))
    }
}
