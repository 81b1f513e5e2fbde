//! Key/value storage capability.
//!
//! Everything the app persists goes through `KeyValueStore`, so tests can
//! swap the SQLite-backed store for `MemoryStore`.

mod memory;
mod sqlite;

use std::future::Future;

use anyhow::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub trait KeyValueStore: Clone + Send + Sync + 'static {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Replaces any previous value.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}
