//! Opening the local cache database

use std::path::Path;

use libsql::{Builder, Connection, Database as LibSqlDatabase};

use super::migrations;
use crate::error::Result;

/// An open, migrated libSQL cache with its single connection.
pub struct Database {
    _db: LibSqlDatabase,
    conn: Connection,
}

impl Database {
    /// Open (or create) the cache file at `path` and migrate it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let location = path.as_ref().to_string_lossy().to_string();
        let database = Self::prepare(&location).await?;
        tracing::debug!("Opened local cache at {}", location);
        Ok(database)
    }

    /// Open a throwaway in-memory cache.
    pub async fn open_in_memory() -> Result<Self> {
        Self::prepare(":memory:").await
    }

    async fn prepare(location: &str) -> Result<Self> {
        let db = Builder::new_local(location).build().await?;
        let conn = db.connect()?;

        // Best effort: in-memory databases reject WAL
        for pragma in [
            "PRAGMA journal_mode = WAL;",
            "PRAGMA synchronous = NORMAL;",
            "PRAGMA foreign_keys = ON;",
        ] {
            conn.execute(pragma, ()).await.ok();
        }

        migrations::run(&conn).await?;
        Ok(Self { _db: db, conn })
    }

    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
