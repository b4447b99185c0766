//! In-process API fakes for engine and controller tests.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;

use crate::api::{
    ApiError, ApiResult, DesktopApi, NewFolder, NewLink, PullDataset, PullRequest, PushReport,
    PushRequest, RemoteSettings, RemoteSettingsUpdate, SyncApi,
};
use crate::models::{FolderRef, Icon, IconId, IconKind, Scope};

#[derive(Default)]
pub struct FakeSyncState {
    pub pushes: Vec<PushRequest>,
    pub pulls: Vec<PullRequest>,
    pub push_response: PushReport,
    pub push_error: Option<ApiError>,
    pub pull_response: PullDataset,
    pub pull_error: Option<ApiError>,
    pub remote_settings: RemoteSettings,
    pub settings_updates: Vec<RemoteSettingsUpdate>,
    pub tenants_seen: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeSyncApi {
    inner: Arc<Mutex<FakeSyncState>>,
}

impl FakeSyncApi {
    pub fn state(&self) -> MutexGuard<'_, FakeSyncState> {
        self.inner.lock().unwrap()
    }
}

impl SyncApi for FakeSyncApi {
    async fn push(&self, scope: &Scope, request: &PushRequest) -> ApiResult<PushReport> {
        let mut state = self.state();
        state.tenants_seen.push(scope.tenant_id().to_string());
        state.pushes.push(request.clone());
        match &state.push_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.push_response.clone()),
        }
    }

    async fn pull(&self, scope: &Scope, request: &PullRequest) -> ApiResult<PullDataset> {
        let mut state = self.state();
        state.tenants_seen.push(scope.tenant_id().to_string());
        state.pulls.push(request.clone());
        match &state.pull_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.pull_response.clone()),
        }
    }

    async fn get_settings(&self, _scope: &Scope) -> ApiResult<RemoteSettings> {
        Ok(self.state().remote_settings.clone())
    }

    async fn update_settings(
        &self,
        _scope: &Scope,
        update: &RemoteSettingsUpdate,
    ) -> ApiResult<RemoteSettings> {
        let mut state = self.state();
        state.settings_updates.push(update.clone());
        state.remote_settings.upload_enabled = update.upload_enabled;
        state.remote_settings.conflict_strategy = update.conflict_strategy.clone();
        Ok(state.remote_settings.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopCall {
    List(FolderRef),
    Move(IconId, FolderRef),
    Position(IconId, i64, i64),
    Rename(IconId, String),
    Uninstall(IconId),
    CreateFolder(NewFolder),
    CreateLink(NewLink),
}

#[derive(Default)]
pub struct FakeDesktopState {
    pub calls: Vec<DesktopCall>,
    pub list_response: Vec<Icon>,
    pub list_error: Option<ApiError>,
    /// Holds `list_icons` until notified
    pub list_gate: Option<Arc<Notify>>,
    pub move_error: Option<ApiError>,
    /// Holds `move_icon` until notified
    pub move_gate: Option<Arc<Notify>>,
    pub position_error: Option<ApiError>,
    pub mutation_error: Option<ApiError>,
    pub next_icon_id: i64,
}

#[derive(Clone, Default)]
pub struct FakeDesktopApi {
    inner: Arc<Mutex<FakeDesktopState>>,
}

impl FakeDesktopApi {
    pub fn state(&self) -> MutexGuard<'_, FakeDesktopState> {
        self.inner.lock().unwrap()
    }

    fn record(&self, call: DesktopCall) -> ApiResult<()> {
        let mut state = self.state();
        state.calls.push(call);
        state.mutation_error.clone().map_or(Ok(()), Err)
    }

    fn created(&self, title: &str, kind: IconKind, x: i64, y: i64) -> Icon {
        let mut state = self.state();
        state.next_icon_id += 1;
        Icon::new(100 + state.next_icon_id, title, kind).with_position(x, y)
    }
}

async fn wait_for(gate: Option<Arc<Notify>>) {
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

impl DesktopApi for FakeDesktopApi {
    async fn list_icons(&self, _scope: &Scope, parent: FolderRef) -> ApiResult<Vec<Icon>> {
        self.state().calls.push(DesktopCall::List(parent));
        let gate = self.state().list_gate.clone();
        wait_for(gate).await;

        let state = self.state();
        match &state.list_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.list_response.clone()),
        }
    }

    async fn move_icon(&self, _scope: &Scope, icon: IconId, target: FolderRef) -> ApiResult<()> {
        self.state().calls.push(DesktopCall::Move(icon, target));
        let gate = self.state().move_gate.clone();
        wait_for(gate).await;

        self.state().move_error.clone().map_or(Ok(()), Err)
    }

    async fn update_position(
        &self,
        _scope: &Scope,
        icon: IconId,
        x: i64,
        y: i64,
    ) -> ApiResult<()> {
        let mut state = self.state();
        state.calls.push(DesktopCall::Position(icon, x, y));
        state.position_error.clone().map_or(Ok(()), Err)
    }

    async fn rename_icon(&self, _scope: &Scope, icon: IconId, name: &str) -> ApiResult<()> {
        self.record(DesktopCall::Rename(icon, name.to_string()))
    }

    async fn uninstall_icon(&self, _scope: &Scope, icon: IconId) -> ApiResult<()> {
        self.record(DesktopCall::Uninstall(icon))
    }

    async fn create_folder(&self, _scope: &Scope, folder: &NewFolder) -> ApiResult<Icon> {
        self.record(DesktopCall::CreateFolder(folder.clone()))?;
        Ok(self.created(&folder.name, IconKind::Category, folder.x, folder.y))
    }

    async fn create_link(&self, _scope: &Scope, link: &NewLink) -> ApiResult<Icon> {
        self.record(DesktopCall::CreateLink(link.clone()))?;
        Ok(self.created(&link.title, IconKind::Resource, link.x, link.y))
    }
}
