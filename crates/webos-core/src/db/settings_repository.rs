//! Sync settings repository implementation

use crate::error::Result;
use crate::models::{Scope, SyncSettings};
use libsql::{params, Connection};

/// Trait for settings storage operations (async)
#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    /// Load the scope's settings, `None` when never saved
    async fn load(&self, scope: &Scope) -> Result<Option<SyncSettings>>;

    /// Save the scope's settings, replacing any previous record
    async fn save(&self, scope: &Scope, settings: &SyncSettings) -> Result<()>;
}

/// libSQL implementation of `SettingsRepository`
pub struct LibSqlSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for LibSqlSettingsRepository<'_> {
    async fn load(&self, scope: &Scope) -> Result<Option<SyncSettings>> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM sync_settings WHERE tenant_id = ? AND user_id = ?",
                params![scope.tenant_id(), scope.user_id()],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            let payload: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&payload)?))
        } else {
            Ok(None)
        }
    }

    async fn save(&self, scope: &Scope, settings: &SyncSettings) -> Result<()> {
        let payload = serde_json::to_string(settings)?;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO sync_settings (tenant_id, user_id, payload) VALUES (?, ?, ?)",
                params![scope.tenant_id(), scope.user_id(), payload],
            )
            .await?;
        Ok(())
    }
}
