//! Icon cache repository implementation

use crate::error::Result;
use crate::models::{Icon, Scope};
use libsql::{params, Connection};

/// Trait for scoped icon cache operations (async)
#[allow(async_fn_in_trait)]
pub trait IconRepository {
    /// Replace every cached icon of the scope with `icons`, all-or-nothing
    async fn replace_all(&self, scope: &Scope, icons: &[Icon]) -> Result<()>;

    /// List cached icons of the scope in insertion order
    async fn list(&self, scope: &Scope) -> Result<Vec<Icon>>;

    /// Remove every cached icon of the scope
    async fn clear(&self, scope: &Scope) -> Result<()>;
}

/// libSQL implementation of `IconRepository`
pub struct LibSqlIconRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlIconRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    async fn delete_scope(&self, scope: &Scope) -> Result<u64> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM icons WHERE tenant_id = ? AND user_id = ?",
                params![scope.tenant_id(), scope.user_id()],
            )
            .await?;
        Ok(removed)
    }

    async fn write_icons(&self, scope: &Scope, rows: &[(i64, String)]) -> Result<()> {
        self.delete_scope(scope).await?;
        for (icon_id, payload) in rows {
            // Duplicate ids within one set: the later entry wins
            self.conn
                .execute(
                    "INSERT OR REPLACE INTO icons (tenant_id, user_id, icon_id, payload) VALUES (?, ?, ?, ?)",
                    params![scope.tenant_id(), scope.user_id(), *icon_id, payload.as_str()],
                )
                .await?;
        }
        Ok(())
    }
}

impl IconRepository for LibSqlIconRepository<'_> {
    async fn replace_all(&self, scope: &Scope, icons: &[Icon]) -> Result<()> {
        // Serialize up front so an encoding failure never opens a transaction
        let rows = icons
            .iter()
            .map(|icon| Ok((icon.id.get(), serde_json::to_string(icon)?)))
            .collect::<Result<Vec<_>>>()?;

        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        if let Err(e) = self.write_icons(scope, &rows).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e);
        }

        if let Err(e) = self.conn.execute("COMMIT", ()).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }

        tracing::debug!("Cached {} icons for scope {}", rows.len(), scope);
        Ok(())
    }

    async fn list(&self, scope: &Scope) -> Result<Vec<Icon>> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM icons WHERE tenant_id = ? AND user_id = ? ORDER BY rowid",
                params![scope.tenant_id(), scope.user_id()],
            )
            .await?;

        let mut icons = Vec::new();
        while let Some(row) = rows.next().await? {
            let payload: String = row.get(0)?;
            icons.push(serde_json::from_str(&payload)?);
        }
        Ok(icons)
    }

    async fn clear(&self, scope: &Scope) -> Result<()> {
        let removed = self.delete_scope(scope).await?;
        tracing::debug!("Cleared {} cached icons for scope {}", removed, scope);
        Ok(())
    }
}
