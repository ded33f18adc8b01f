//! Local filesystem backend for attachment bytes.
//!
//! Rows in `attachments` store a path relative to the storage root; this
//! module is the only place that turns such a path into a file on disk.

use std::io;
use std::path::{Path, PathBuf};

use matuto_core::attach::validate_relative_path;

use crate::config::StorageConfig;

/// Attachment storage rooted at [`StorageConfig::base_path`].
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.base_path.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` at `relative`, creating the day directory when needed.
    pub async fn save(&self, relative: &str, data: &[u8]) -> io::Result<()> {
        let path = self.resolve(relative)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await
    }

    /// Remove the file at `relative`. A file that is already gone is not an error.
    pub async fn delete(&self, relative: &str) -> io::Result<()> {
        let path = self.resolve(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn resolve(&self, relative: &str) -> io::Result<PathBuf> {
        validate_relative_path(relative)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        Ok(self.root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(&StorageConfig {
            base_path: dir.path().to_path_buf(),
            base_url: "http://localhost/uploads/".into(),
            max_size_bytes: 1024,
        })
    }

    #[tokio::test]
    async fn save_creates_day_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(&dir);

        storage
            .save("2024-05-01/1_a.txt", b"hello")
            .await
            .expect("save should succeed");

        let written = std::fs::read(dir.path().join("2024-05-01/1_a.txt")).expect("file exists");
        assert_eq!(written, b"hello");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(&dir);

        storage.save("d/1_a.txt", b"x").await.expect("save");
        storage.delete("d/1_a.txt").await.expect("first delete");
        storage.delete("d/1_a.txt").await.expect("second delete");
        assert!(!dir.path().join("d/1_a.txt").exists());
    }

    #[tokio::test]
    async fn escaping_paths_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(&dir);

        let err = storage.save("../outside.txt", b"x").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(storage.delete("/etc/passwd").await.is_err());
    }
}
