use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::migration;
use crate::projects::Projects;

/// Handle to the project database. Owns the single connection; accessors
/// borrow it mutably so statement and transaction lifetimes stay scoped.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database at `path`, creating the file and any missing
    /// parent directories, and bring the schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        // One writer behind a mutex, short transactions. WAL keeps the
        // occasional concurrent reader cheap; the busy timeout rides out
        // checkpoints instead of surfacing SQLITE_BUSY to tool handlers.
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        migration::apply(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn projects(&mut self) -> Projects<'_> {
        Projects {
            conn: &mut self.conn,
        }
    }
}
