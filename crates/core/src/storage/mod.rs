//! Local storage abstraction
//!
//! String key-value persistence in the shape of the browser's
//! localStorage: stores write whole collections through on every
//! mutation and restore them best-effort at startup.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;

use crate::Result;

/// Key under which the session snapshot is persisted.
pub const SESSION_KEY: &str = "currentUser";

/// Key under which the task collection is persisted.
pub const TASKS_KEY: &str = "todos";

/// String key-value store with best-effort durability
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`, if any
    async fn remove_item(&self, key: &str) -> Result<()>;
}
