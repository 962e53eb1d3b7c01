/*!
 * Local persistence: a SQLite-backed key-value blob store.
 *
 * Values are opaque strings (JSON documents written by the session store).
 * Writes replace the previous value; there is no cross-process locking.
 */

use anyhow::Result;

pub mod connection;
pub mod repository;
pub mod schema;

pub use connection::DatabaseConnection;
pub use repository::KvRepository;

/// A string-keyed store of string blobs
pub trait BlobStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;
}
