//! Push-then-pull reconciliation between the local cache and the server.
//!
//! One cycle (`sync_now`) walks `idle → pushing → pulling → settled`:
//!
//! - **pushing** (only with uploads enabled): every queued icon update of the
//!   scope goes out as one batch. The queue is trimmed only after the server
//!   accepts it, so a failed push is resent next cycle (at-least-once). A
//!   failed push does not stop the cycle.
//! - **pulling**: always runs. A dataset carrying `icons` replaces the whole
//!   icon cache; there is no field-level merge, so the server wins. A failed
//!   pull aborts the cycle and leaves `last_sync_at` alone, so the retry asks
//!   for the same window.
//! - **settled**: `last_sync_at` moves to the server's `server_time`, or the
//!   local clock when the server sent none.

mod scheduler;

use serde::Serialize;

use crate::api::{
    ApiError, PullRequest, PushReport, PushRequest, RemoteSettingsUpdate, SyncApi,
};
use crate::clock::{Clock, SystemClock};
use crate::models::{Scope, SyncSettings};
use crate::services::LocalStore;
use crate::state::SyncPhase;
use crate::Result;

/// Outcome of one sync cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    /// Settings as persisted at the end of the cycle
    pub settings: SyncSettings,
    /// Phases visited, in order
    pub phases: Vec<SyncPhase>,
    /// Pending edits removed from the queue after a successful push
    pub pushed: usize,
    /// Server tally of the push, when one was accepted
    pub push_report: Option<PushReport>,
    /// Why the push failed; the queue was left intact
    #[serde(serialize_with = "serialize_api_error")]
    pub push_error: Option<ApiError>,
    /// Icons written to the cache by the pull, `None` when the pull carried no icon list
    pub pulled_icons: Option<usize>,
}

impl SyncReport {
    fn enter(&mut self, phase: SyncPhase, scope: &Scope) {
        tracing::debug!("Sync for scope {} entering {}", scope, phase);
        self.phases.push(phase);
    }
}

fn serialize_api_error<S: serde::Serializer>(
    error: &Option<ApiError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Drives sync cycles for any scope against one store and one API.
pub struct SyncEngine<A, C = SystemClock> {
    store: LocalStore,
    api: A,
    clock: C,
}

impl<A: SyncApi> SyncEngine<A> {
    pub const fn new(store: LocalStore, api: A) -> Self {
        Self::with_clock(store, api, SystemClock)
    }
}

impl<A: SyncApi, C: Clock> SyncEngine<A, C> {
    pub const fn with_clock(store: LocalStore, api: A, clock: C) -> Self {
        Self { store, api, clock }
    }

    pub const fn store(&self) -> &LocalStore {
        &self.store
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Stored settings of the scope, or the defaults when none were saved.
    pub async fn load_settings(&self, scope: &Scope) -> Result<SyncSettings> {
        Ok(self.store.get_settings(scope).await?.unwrap_or_default())
    }

    pub async fn save_settings(&self, scope: &Scope, settings: &SyncSettings) -> Result<()> {
        self.store.save_settings(scope, settings).await
    }

    /// Forget `last_sync_at` so the next pull asks for everything.
    pub async fn reset_last_sync(&self, scope: &Scope) -> Result<SyncSettings> {
        let mut settings = self.load_settings(scope).await?;
        settings.reset_last_sync();
        self.store.save_settings(scope, &settings).await?;
        tracing::info!("Reset last sync time for scope {}", scope);
        Ok(settings)
    }

    /// Adopt the server's upload flag and conflict strategy.
    ///
    /// `last_sync_at` only moves if the server's value is newer.
    pub async fn refresh_settings_from_server(&self, scope: &Scope) -> Result<SyncSettings> {
        let remote = self.api.get_settings(scope).await?;
        let mut settings = self.load_settings(scope).await?;

        settings.upload_enabled = remote.upload_enabled;
        settings.conflict_strategy = remote.conflict_strategy;
        if let Some(remote_last_sync) = remote.last_sync_at {
            settings.advance_last_sync(remote_last_sync);
        }

        self.store.save_settings(scope, &settings).await?;
        Ok(settings)
    }

    /// Send the upload flag and conflict strategy to the server, then persist.
    pub async fn publish_settings(
        &self,
        scope: &Scope,
        settings: &SyncSettings,
    ) -> Result<SyncSettings> {
        let remote = self
            .api
            .update_settings(scope, &RemoteSettingsUpdate::from(settings))
            .await?;

        let mut published = settings.clone();
        published.upload_enabled = remote.upload_enabled;
        published.conflict_strategy = remote.conflict_strategy;
        self.store.save_settings(scope, &published).await?;
        Ok(published)
    }

    /// Run one push-then-pull cycle for the scope.
    pub async fn sync_now(&self, scope: &Scope) -> Result<SyncReport> {
        let mut settings = self.load_settings(scope).await?;
        let mut report = SyncReport {
            settings: settings.clone(),
            phases: vec![SyncPhase::Idle],
            pushed: 0,
            push_report: None,
            push_error: None,
            pulled_icons: None,
        };

        if settings.upload_enabled {
            report.enter(SyncPhase::Pushing, scope);
            self.push_pending(scope, &settings, &mut report).await?;
        }

        report.enter(SyncPhase::Pulling, scope);
        let dataset = match self
            .api
            .pull(
                scope,
                &PullRequest {
                    since: settings.last_sync_at,
                },
            )
            .await
        {
            Ok(dataset) => dataset,
            Err(error) => {
                tracing::warn!("Pull failed for scope {}: {}", scope, error);
                return Err(error.into());
            }
        };

        if let Some(icons) = &dataset.icons {
            self.store.save_icons(scope, icons).await?;
            report.pulled_icons = Some(icons.len());
        }
        tracing::debug!(
            "Pulled {} icons, {} resources, {} categories for scope {}",
            dataset.icons.as_ref().map_or(0, Vec::len),
            dataset.resources.len(),
            dataset.categories.len(),
            scope
        );

        report.enter(SyncPhase::Settled, scope);
        settings.advance_last_sync(dataset.server_time.unwrap_or_else(|| self.clock.now()));
        self.store.save_settings(scope, &settings).await?;
        report.settings = settings;

        tracing::info!(
            "Sync settled for scope {} (pushed {}, last sync {})",
            scope,
            report.pushed,
            report
                .settings
                .last_sync_at
                .map_or_else(|| "never".to_string(), |at| at.to_rfc3339())
        );
        Ok(report)
    }

    async fn push_pending(
        &self,
        scope: &Scope,
        settings: &SyncSettings,
        report: &mut SyncReport,
    ) -> Result<()> {
        let pending = self.store.get_pending_icon_updates(scope).await?;
        if pending.is_empty() {
            return Ok(());
        }

        let (ids, icons): (Vec<i64>, Vec<_>) =
            pending.into_iter().map(|edit| (edit.id, edit.payload)).unzip();
        let request = PushRequest {
            conflict_strategy: settings.conflict_strategy.clone(),
            icons,
        };

        match self.api.push(scope, &request).await {
            Ok(push_report) => {
                self.store.clear_pending(scope, &ids).await?;
                tracing::info!(
                    "Pushed {} pending edits for scope {} (server updated {}, skipped {})",
                    ids.len(),
                    scope,
                    push_report.updated,
                    push_report.skipped
                );
                report.pushed = ids.len();
                report.push_report = Some(push_report);
            }
            Err(error) => {
                tracing::warn!(
                    "Push of {} pending edits failed for scope {}; keeping them queued: {}",
                    ids.len(),
                    scope,
                    error
                );
                report.push_error = Some(error);
            }
        }
        Ok(())
    }
}
