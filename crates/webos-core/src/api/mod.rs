//! Remote API boundary: the desktop, sync and tenant endpoints of the backend.
//!
//! The sync engine and desktop controller are generic over these traits;
//! [`HttpApi`] is the production implementation.

mod client;
mod error;
mod types;

pub use client::HttpApi;
pub use error::{ApiError, ApiResult};
pub use types::{
    NewFolder, NewLink, PullDataset, PullRequest, PushReport, PushRequest, RemoteSettings,
    RemoteSettingsUpdate,
};

use crate::models::{FolderRef, Icon, IconId, Membership, Scope, Tenant};

/// Icon listing and mutation endpoints (async)
#[allow(async_fn_in_trait)]
pub trait DesktopApi {
    /// `GET /desktop/?parent_id=…`
    async fn list_icons(&self, scope: &Scope, parent: FolderRef) -> ApiResult<Vec<Icon>>;

    /// `PATCH /desktop/{id}/move/` with `{parent_id}`
    async fn move_icon(&self, scope: &Scope, icon: IconId, target: FolderRef) -> ApiResult<()>;

    /// `PATCH /desktop/{id}/move/` with `{x, y}`
    async fn update_position(&self, scope: &Scope, icon: IconId, x: i64, y: i64)
        -> ApiResult<()>;

    /// `POST /desktop/{id}/rename/` with `{name}`
    async fn rename_icon(&self, scope: &Scope, icon: IconId, name: &str) -> ApiResult<()>;

    /// `DELETE /desktop/{id}/uninstall/`; also deletes what the icon points at
    async fn uninstall_icon(&self, scope: &Scope, icon: IconId) -> ApiResult<()>;

    /// `POST /desktop/create_folder/`, returning the new folder icon
    async fn create_folder(&self, scope: &Scope, folder: &NewFolder) -> ApiResult<Icon>;

    /// `POST /desktop/create_link/`, returning the new link icon
    async fn create_link(&self, scope: &Scope, link: &NewLink) -> ApiResult<Icon>;
}

/// Tenant discovery (async). Not tied to a scope: these list every tenant
/// the signed-in user can act for.
#[allow(async_fn_in_trait)]
pub trait TenantApi {
    /// `GET /tenants/`
    async fn list_tenants(&self) -> ApiResult<Vec<Tenant>>;

    /// `GET /memberships/`
    async fn list_memberships(&self) -> ApiResult<Vec<Membership>>;
}

/// Sync endpoints (async)
#[allow(async_fn_in_trait)]
pub trait SyncApi {
    /// `POST /sync/push/`
    async fn push(&self, scope: &Scope, request: &PushRequest) -> ApiResult<PushReport>;

    /// `POST /sync/pull/`
    async fn pull(&self, scope: &Scope, request: &PullRequest) -> ApiResult<PullDataset>;

    /// `GET /sync/settings/`
    async fn get_settings(&self, scope: &Scope) -> ApiResult<RemoteSettings>;

    /// `PATCH /sync/settings/`
    async fn update_settings(
        &self,
        scope: &Scope,
        update: &RemoteSettingsUpdate,
    ) -> ApiResult<RemoteSettings>;
}
