//! Content fingerprinting and change detection.

mod detector;
mod snapshot;
mod store;

pub use detector::{ChangeDetector, SavingsEstimate};
pub use snapshot::{ComponentSnapshot, fingerprint};
pub use store::SnapshotStore;
