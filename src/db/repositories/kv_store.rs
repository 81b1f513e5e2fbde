use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::db::Database;

impl Database {
    /// Raw value stored under `key`, if any.
    pub async fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.execute(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .with_context(|| format!("failed to read key {key}"))?;
            Ok(value)
        })
        .await
    }

    /// Insert or replace the value under `key`.
    pub async fn kv_set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write key {key}"))?;
            Ok(())
        })
        .await
    }

    /// Deleting a missing key is not an error.
    pub async fn kv_delete(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.execute(move |conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
                .with_context(|| format!("failed to delete key {key}"))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[tokio::test]
    async fn set_get_delete() {
        let db = Database::in_memory().unwrap();

        assert_eq!(db.kv_get("a").await.unwrap(), None);

        db.kv_set("a", "1".into()).await.unwrap();
        db.kv_set("a", "2".into()).await.unwrap();
        assert_eq!(db.kv_get("a").await.unwrap().as_deref(), Some("2"));

        db.kv_delete("a").await.unwrap();
        db.kv_delete("a").await.unwrap();
        assert_eq!(db.kv_get("a").await.unwrap(), None);
    }
}
