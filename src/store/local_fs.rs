//! Local file system store backend.
//!
//! Stores each key in its own JSON file under a base directory, so that
//! independent window processes on the same machine share state and the
//! state survives a crash of any one of them. Writes go through a
//! temporary file and a rename to keep readers from ever seeing a half
//! written record.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::config::StoreConfig;
use crate::store::backend::{StoreBackend, StoreError};

/// File-backed implementation of [`StoreBackend`].
///
/// # Error Handling
///
/// A missing file reads as `Ok(None)`. A file that exists but does not
/// parse as JSON also reads as `Ok(None)`; the corruption is logged and
/// the next write simply replaces it.
#[derive(Clone)]
pub struct LocalFsStore {
    config: StoreConfig,
}

impl LocalFsStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        let sanitized = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        let mut path = self.config.base_dir.clone();
        path.push(format!("{}.{}", sanitized, self.config.file_extension));
        path
    }

    fn validate_key(&self, key: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("Key cannot be empty".into()));
        }
        Ok(())
    }

    async fn write_atomically(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::Storage("Invalid path: no parent directory".to_string()))?;

        fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to create directory: {}", e)))?;

        let temp_file = NamedTempFile::new_in(dir)
            .map_err(|e| StoreError::Storage(format!("Failed to create temporary file: {}", e)))?;
        let temp_path = temp_file.path().to_path_buf();

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to create file: {}", e)))?;

        file.write_all(data)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to write to file: {}", e)))?;

        file.flush()
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to flush file: {}", e)))?;

        fs::rename(&temp_path, path)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to rename file: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for LocalFsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.validate_key(key)?;
        let path = self.file_path(key);

        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        match serde_json::from_slice(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "malformed store file, treating as absent");
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.validate_key(key)?;
        let data = serde_json::to_vec(&value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.write_atomically(&self.file_path(key), &data).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.validate_key(key)?;
        match fs::remove_file(self.file_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Storage(format!("Failed to remove file: {}", e))),
        }
    }
}
