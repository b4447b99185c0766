//! Pending edit queue repository implementation

use crate::error::{Error, Result};
use crate::models::{IconUpdate, PendingEdit, PendingKind, Scope};
use libsql::{params, Connection};

/// Trait for the scoped pending-edit queue (async)
#[allow(async_fn_in_trait)]
pub trait PendingEditRepository {
    /// Append an icon update and return its sequence id
    async fn enqueue(&self, scope: &Scope, update: &IconUpdate) -> Result<i64>;

    /// List queued icon updates of the scope, oldest first
    async fn list(&self, scope: &Scope) -> Result<Vec<PendingEdit>>;

    /// Delete the given ids; ids that are missing or belong to another scope are ignored
    async fn remove(&self, scope: &Scope, ids: &[i64]) -> Result<()>;
}

/// libSQL implementation of `PendingEditRepository`
pub struct LibSqlPendingEditRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlPendingEditRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    async fn delete_ids(&self, scope: &Scope, ids: &[i64]) -> Result<()> {
        for id in ids {
            self.conn
                .execute(
                    "DELETE FROM pending_edits WHERE id = ? AND tenant_id = ? AND user_id = ?",
                    params![*id, scope.tenant_id(), scope.user_id()],
                )
                .await?;
        }
        Ok(())
    }
}

impl PendingEditRepository for LibSqlPendingEditRepository<'_> {
    async fn enqueue(&self, scope: &Scope, update: &IconUpdate) -> Result<i64> {
        let payload = serde_json::to_string(update)?;
        self.conn
            .execute(
                "INSERT INTO pending_edits (tenant_id, user_id, kind, payload) VALUES (?, ?, ?, ?)",
                params![
                    scope.tenant_id(),
                    scope.user_id(),
                    PendingKind::IconUpdate.as_str(),
                    payload
                ],
            )
            .await?;

        Ok(self.conn.last_insert_rowid())
    }

    async fn list(&self, scope: &Scope) -> Result<Vec<PendingEdit>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, payload FROM pending_edits
                 WHERE tenant_id = ? AND user_id = ? AND kind = ?
                 ORDER BY id ASC",
                params![
                    scope.tenant_id(),
                    scope.user_id(),
                    PendingKind::IconUpdate.as_str()
                ],
            )
            .await?;

        let mut edits = Vec::new();
        while let Some(row) = rows.next().await? {
            let id: i64 = row.get(0)?;
            let payload: String = row.get(1)?;
            let payload = serde_json::from_str(&payload).map_err(|error| {
                Error::Database(format!("corrupt pending edit {id}: {error}"))
            })?;
            edits.push(PendingEdit { id, payload });
        }
        Ok(edits)
    }

    async fn remove(&self, scope: &Scope, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        if let Err(e) = self.delete_ids(scope, ids).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e);
        }

        if let Err(e) = self.conn.execute("COMMIT", ()).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }

        Ok(())
    }
}
