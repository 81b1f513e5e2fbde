use std::future::Future;

use anyhow::Result;

use crate::db::Database;

use super::KeyValueStore;

/// Durable store backed by the `kv_store` table.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        self.db.kv_get(key)
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send {
        self.db.kv_set(key, value)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        self.db.kv_delete(key)
    }
}
