//! In-memory storage implementation
//!
//! Used by tests and ephemeral setups that do not need a data directory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Storage;
use crate::Result;

/// HashMap-backed storage with no durability
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item("todos").await.unwrap().is_none());

        storage.set_item("todos", "[]").await.unwrap();
        assert_eq!(storage.get_item("todos").await.unwrap().as_deref(), Some("[]"));

        storage.set_item("todos", "[1]").await.unwrap();
        assert_eq!(
            storage.get_item("todos").await.unwrap().as_deref(),
            Some("[1]")
        );

        storage.remove_item("todos").await.unwrap();
        assert!(storage.get_item("todos").await.unwrap().is_none());
    }
}
