//! Versioned schema for the local cache.
//!
//! Applied versions are recorded in `schema_version`; each step runs in its
//! own transaction and is skipped once recorded.

use libsql::Connection;

use crate::error::Result;

const CURRENT_VERSION: i32 = 1;

/// Tables introduced by version 1. Every table carries `tenant_id` and
/// `user_id` as separate columns.
const V1_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY
    )",
    "CREATE TABLE IF NOT EXISTS icons (
        tenant_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        icon_id INTEGER NOT NULL,
        payload TEXT NOT NULL,
        PRIMARY KEY (tenant_id, user_id, icon_id)
    )",
    "CREATE TABLE IF NOT EXISTS sync_settings (
        tenant_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        payload TEXT NOT NULL,
        PRIMARY KEY (tenant_id, user_id)
    )",
    "CREATE TABLE IF NOT EXISTS pending_edits (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tenant_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        payload TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_pending_edits_scope
        ON pending_edits(tenant_id, user_id, id)",
];

/// Bring the schema up to [`CURRENT_VERSION`].
pub async fn run(conn: &Connection) -> Result<()> {
    let applied = applied_version(conn).await?;
    if applied < 1 {
        apply(conn, 1, V1_STATEMENTS).await?;
    }
    tracing::debug!("Local cache schema at version {CURRENT_VERSION}");
    Ok(())
}

async fn applied_version(conn: &Connection) -> Result<i32> {
    let mut tables = conn
        .query(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            (),
        )
        .await?;
    let has_table = match tables.next().await? {
        Some(row) => row.get::<i64>(0)? > 0,
        None => false,
    };
    if !has_table {
        return Ok(0);
    }

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i32>(0)?),
        None => Ok(0),
    }
}

async fn apply(conn: &Connection, version: i32, statements: &[&str]) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", ()).await?;

    let outcome = async {
        for statement in statements {
            conn.execute(statement, ()).await?;
        }
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            libsql::params![i64::from(version)],
        )
        .await?;
        conn.execute("COMMIT", ()).await?;
        Ok::<(), libsql::Error>(())
    }
    .await;

    if let Err(error) = outcome {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(error.into());
    }

    tracing::info!("Local cache schema now at version {version}");
    Ok(())
}
