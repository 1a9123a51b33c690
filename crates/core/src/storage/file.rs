//! File-based storage implementation
//!
//! Stores each key as a JSON file under a data directory.

use std::path::PathBuf;

use async_trait::async_trait;

use super::Storage;
use crate::{Error, Result};

/// File-backed storage: one file per key under a base directory
///
/// The directory is created lazily on first write.
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| Error::Storage(format!("Failed to read '{}': {}", key, err)))?;
        Ok(Some(content))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|err| Error::Storage(format!("Failed to create storage dir: {}", err)))?;
        tokio::fs::write(self.key_path(key), value)
            .await
            .map_err(|err| Error::Storage(format!("Failed to write '{}': {}", key, err)))?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(());
        }
        tokio::fs::remove_file(&path)
            .await
            .map_err(|err| Error::Storage(format!("Failed to remove '{}': {}", key, err)))?;
        Ok(())
    }
}
