//! Shared local cache service used by the sync engine and desktop controller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{
    Database, IconRepository, LibSqlIconRepository, LibSqlPendingEditRepository,
    LibSqlSettingsRepository, PendingEditRepository, SettingsRepository,
};
use crate::models::{Icon, IconUpdate, PendingEdit, Scope, SyncSettings};
use crate::Result;

/// Thread-safe handle to the one physical cache shared by all scopes.
///
/// Cloning is cheap; clones share the same connection. Every operation takes
/// the scope explicitly and only ever touches that scope's rows.
#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl LocalStore {
    /// Open the cache at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = match Database::open(&db_path).await {
            Ok(db) => db,
            Err(error) if Self::is_corrupted_db_error(&error) => {
                tracing::warn!(
                    "Local cache at {} is unreadable: {}. Moving it aside and starting empty.",
                    db_path.display(),
                    error
                );
                Self::quarantine_corrupted_db_files(&db_path)?;
                Database::open(&db_path).await?
            }
            Err(error) => return Err(error),
        };

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory cache (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    /// Filesystem location of the cache, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn is_corrupted_db_error(error: &crate::Error) -> bool {
        error
            .to_string()
            .to_ascii_lowercase()
            .contains("file is not a database")
    }

    fn quarantine_corrupted_db_files(db_path: &Path) -> Result<()> {
        if db_path.exists() {
            let timestamp = chrono::Utc::now().timestamp_millis();
            let file_name = db_path
                .file_name()
                .map_or_else(|| "cache.db".into(), |name| name.to_string_lossy());
            let backup_path = db_path.with_file_name(format!("{file_name}.corrupt-{timestamp}"));

            std::fs::rename(db_path, &backup_path)?;
            tracing::warn!(
                "Moved corrupted cache file from {} to {}",
                db_path.display(),
                backup_path.display()
            );
        }

        let Some(parent) = db_path.parent() else {
            return Ok(());
        };
        let Some(base_name) = db_path.file_name().and_then(|name| name.to_str()) else {
            return Ok(());
        };
        let sidecar_prefix = format!("{base_name}-");

        for entry in std::fs::read_dir(parent)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if file_name.starts_with(&sidecar_prefix) {
                let path = entry.path();
                std::fs::remove_file(&path)?;
                tracing::warn!("Removed stale cache sidecar {}", path.display());
            }
        }

        Ok(())
    }

    /// Replace the scope's icon set atomically.
    pub async fn save_icons(&self, scope: &Scope, icons: &[Icon]) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlIconRepository::new(db.connection());
        repo.replace_all(scope, icons).await
    }

    /// All cached icons of the scope.
    pub async fn get_icons(&self, scope: &Scope) -> Result<Vec<Icon>> {
        let db = self.db.lock().await;
        let repo = LibSqlIconRepository::new(db.connection());
        repo.list(scope).await
    }

    /// Drop the scope's cached icons.
    pub async fn clear_icons(&self, scope: &Scope) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlIconRepository::new(db.connection());
        repo.clear(scope).await
    }

    /// Stored settings of the scope, `None` when never saved.
    pub async fn get_settings(&self, scope: &Scope) -> Result<Option<SyncSettings>> {
        let db = self.db.lock().await;
        let repo = LibSqlSettingsRepository::new(db.connection());
        repo.load(scope).await
    }

    /// Persist the scope's settings.
    pub async fn save_settings(&self, scope: &Scope, settings: &SyncSettings) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlSettingsRepository::new(db.connection());
        repo.save(scope, settings).await
    }

    /// Append an icon update to the pending queue, returning its id.
    pub async fn queue_icon_update(&self, scope: &Scope, update: &IconUpdate) -> Result<i64> {
        let db = self.db.lock().await;
        let repo = LibSqlPendingEditRepository::new(db.connection());
        repo.enqueue(scope, update).await
    }

    /// Queued icon updates of the scope, oldest first.
    pub async fn get_pending_icon_updates(&self, scope: &Scope) -> Result<Vec<PendingEdit>> {
        let db = self.db.lock().await;
        let repo = LibSqlPendingEditRepository::new(db.connection());
        repo.list(scope).await
    }

    /// Delete exactly the given pending ids.
    pub async fn clear_pending(&self, scope: &Scope, ids: &[i64]) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlPendingEditRepository::new(db.connection());
        repo.remove(scope, ids).await
    }

    #[cfg(test)]
    pub(crate) async fn execute_sql(&self, sql: &str) -> Result<u64> {
        let db = self.db.lock().await;
        Ok(db.connection().execute(sql, ()).await?)
    }
}
