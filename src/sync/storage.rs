//! Artifact storage
//!
//! The reconciler only sees repository-relative paths; the store decides
//! where they live.

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::parser::traits::ArtifactError;

/// Trait for reading and writing artifact text
#[cfg_attr(test, automock)]
pub trait ArtifactStore: Send + Sync {
    /// Whether the artifact exists
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole artifact as UTF-8
    fn read_text(&self, path: &Path) -> Result<String, ArtifactError>;

    /// Replace the artifact's content
    fn write_text(&self, path: &Path, text: &str) -> Result<(), ArtifactError>;
}

/// Store backed by the file system, rooted at a repository checkout
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl ArtifactStore for FsStore {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn read_text(&self, path: &Path) -> Result<String, ArtifactError> {
        let full = self.resolve(path);
        std::fs::read_to_string(&full)
            .map_err(|e| ArtifactError::Io(format!("failed to read {}: {}", full.display(), e)))
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<(), ArtifactError> {
        let full = self.resolve(path);
        debug!("Writing {} bytes to {}", text.len(), full.display());
        std::fs::write(&full, text)
            .map_err(|e| ArtifactError::Io(format!("failed to write {}: {}", full.display(), e)))
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::ArtifactStore;
    use crate::parser::traits::ArtifactError;

    /// In-memory store that records every write
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        files: Mutex<HashMap<PathBuf, String>>,
        writes: Mutex<Vec<PathBuf>>,
    }

    impl MemoryStore {
        pub(crate) fn with_file(self, path: &str, text: &str) -> Self {
            self.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), text.to_string());
            self
        }

        pub(crate) fn get(&self, path: &str) -> Option<String> {
            self.files.lock().unwrap().get(Path::new(path)).cloned()
        }

        pub(crate) fn writes(&self) -> Vec<PathBuf> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl ArtifactStore for MemoryStore {
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }

        fn read_text(&self, path: &Path) -> Result<String, ArtifactError> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| ArtifactError::Io(format!("{} not found", path.display())))
        }

        fn write_text(&self, path: &Path, text: &str) -> Result<(), ArtifactError> {
            self.writes.lock().unwrap().push(path.to_path_buf());
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), text.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fs_store_resolves_paths_under_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("tests")).unwrap();
        let store = FsStore::new(dir.path());
        let path = Path::new("tests/pr_test.go");

        assert!(!store.exists(path));
        store.write_text(path, "const latestVersion = \"17\"\n").unwrap();

        assert!(store.exists(path));
        assert_eq!(
            store.read_text(path).unwrap(),
            "const latestVersion = \"17\"\n"
        );
        assert!(dir.path().join("tests/pr_test.go").is_file());
    }

    #[test]
    fn fs_store_reports_missing_file_as_io_error() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());

        let result = store.read_text(Path::new("variables.tf"));

        assert!(matches!(result, Err(ArtifactError::Io(_))));
    }

    #[test]
    fn fs_store_treats_directories_as_missing() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("variables.tf")).unwrap();
        let store = FsStore::new(dir.path());

        assert!(!store.exists(Path::new("variables.tf")));
    }
}
