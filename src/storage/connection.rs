/*!
 * The SQLite file behind the blob store.
 *
 * One connection per process, shared behind a mutex. Opening a database
 * creates its directory and brings the schema up to date.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::schema;

/// Application directory under the platform data dir
const APP_DIR: &str = "lingotutor";

/// Database file inside `APP_DIR`
const DB_FILE: &str = "lingotutor.db";

/// Shared handle to the session database
#[derive(Clone, Debug)]
pub struct DatabaseConnection {
    location: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open the database in the platform data directory
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_location()?)
    }

    /// Open `path`, creating the file and its directory when missing
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let location = path.as_ref().to_path_buf();
        if let Some(dir) = location.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;
        }

        let conn = Connection::open(&location)
            .with_context(|| format!("Cannot open database {}", location.display()))?;
        info!("Session database: {}", location.display());
        Self::ready(conn, location)
    }

    /// A throwaway database that lives as long as its handles
    pub fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory session database");
        let conn = Connection::open_in_memory().context("Cannot open in-memory database")?;
        Self::ready(conn, PathBuf::from(":memory:"))
    }

    fn ready(conn: Connection, location: PathBuf) -> Result<Self> {
        schema::initialize_schema(&conn)?;
        Ok(Self {
            location,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// `<data dir>/lingotutor/lingotutor.db`
    pub fn default_location() -> Result<PathBuf> {
        dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .map(|dir| dir.join(APP_DIR).join(DB_FILE))
            .ok_or_else(|| anyhow!("No data directory on this platform, set storage.database_path"))
    }

    pub fn path(&self) -> &Path {
        &self.location
    }

    /// Run `f` with exclusive access to the connection
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn.lock();
        f(&conn)
    }
}
