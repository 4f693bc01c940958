//! Component being documented.

use std::path::{Path, PathBuf};

/// A unit of source content that documents are generated for.
///
/// The caller (a file-system scanner, out of scope here) decides which
/// files belong to a component; skald only fingerprints them. File paths
/// are relative to `root` so snapshots stay stable when a repository is
/// checked out at a different location.
#[derive(Debug, Clone)]
pub struct Component {
    /// Component identifier, unique within the snapshot store.
    pub name: String,
    /// Directory the file paths are resolved against.
    pub root: PathBuf,
    /// Files that make up the component, relative to `root`.
    pub files: Vec<PathBuf>,
}

impl Component {
    /// Create a component with no files.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            files: Vec::new(),
        }
    }

    /// Set the component's file list.
    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    /// Absolute path of a member file.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        self.root.join(file)
    }
}
