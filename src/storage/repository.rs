/*!
 * Repository layer over the key-value table.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{OptionalExtension, params};

use super::BlobStore;
use super::connection::DatabaseConnection;

/// Key-value repository backed by the `kv_store` table
#[derive(Clone, Debug)]
pub struct KvRepository {
    db: DatabaseConnection,
}

impl KvRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::open_default()?))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::open_in_memory()?))
    }
}

impl BlobStore for KvRepository {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.db.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| row.get(0))
                .optional()?;
            Ok(value)
        })
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, value],
            )?;
            debug!("Stored {} bytes under '{}'", value.len(), key);
            Ok(())
        })
    }
}
