//! `reqwest` implementation of the desktop and sync APIs.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{ApiError, ApiResult};
use super::types::{
    DataEnvelope, ListEnvelope, MoveToFolderBody, NewFolder, NewLink, PositionBody, PullDataset,
    PullRequest, PushReport, PushRequest, RemoteSettings, RemoteSettingsUpdate, RenameBody,
};
use super::{DesktopApi, SyncApi, TenantApi};
use crate::config::ClientConfig;
use crate::models::{FolderRef, Icon, IconId, Membership, Scope, Tenant};

const TENANT_HEADER: &str = "X-Tenant-Id";

/// HTTP client for the WebOS backend.
///
/// The tenant header is taken from the scope passed to each call, never
/// from client state, so one client can serve several scopes.
#[derive(Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpApi {
    /// Build a client from resolved configuration.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        Self::with_options(
            &config.api_base_url,
            config.access_token.clone(),
            config.request_timeout,
        )
    }

    /// Build a client for `base_url` with the default timeout and no token.
    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        Self::with_options(base_url, None, ClientConfig::DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_options(
        base_url: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> ApiResult<Self> {
        // Trailing slash so `join` appends instead of replacing the last segment
        let base_url = Url::parse(&format!("{}/", base_url.trim().trim_end_matches('/')))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ApiError::Client(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http,
            base_url,
            access_token,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorized(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn request(&self, method: Method, url: Url, scope: &Scope) -> RequestBuilder {
        let builder = self.authorized(method, url);
        if scope.has_default_tenant() {
            builder
        } else {
            builder.header(TENANT_HEADER, scope.tenant_id())
        }
    }

    async fn send(builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
        let response = Self::send(builder).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|error| ApiError::Client(format!("invalid response body: {error}")))
    }
}

impl DesktopApi for HttpApi {
    async fn list_icons(&self, scope: &Scope, parent: FolderRef) -> ApiResult<Vec<Icon>> {
        let mut url = self.endpoint("desktop/")?;
        url.query_pairs_mut()
            .append_pair("parent_id", &parent.to_string());
        let envelope: ListEnvelope<Icon> =
            Self::send_json(self.request(Method::GET, url, scope)).await?;
        Ok(envelope.into_items())
    }

    async fn move_icon(&self, scope: &Scope, icon: IconId, target: FolderRef) -> ApiResult<()> {
        let url = self.endpoint(&format!("desktop/{icon}/move/"))?;
        let body = MoveToFolderBody { parent_id: target };
        Self::send(self.request(Method::PATCH, url, scope).json(&body)).await?;
        Ok(())
    }

    async fn update_position(&self, scope: &Scope, icon: IconId, x: i64, y: i64) -> ApiResult<()> {
        let url = self.endpoint(&format!("desktop/{icon}/move/"))?;
        let body = PositionBody { x, y };
        Self::send(self.request(Method::PATCH, url, scope).json(&body)).await?;
        Ok(())
    }

    async fn rename_icon(&self, scope: &Scope, icon: IconId, name: &str) -> ApiResult<()> {
        let url = self.endpoint(&format!("desktop/{icon}/rename/"))?;
        Self::send(
            self.request(Method::POST, url, scope)
                .json(&RenameBody { name }),
        )
        .await?;
        Ok(())
    }

    async fn uninstall_icon(&self, scope: &Scope, icon: IconId) -> ApiResult<()> {
        let url = self.endpoint(&format!("desktop/{icon}/uninstall/"))?;
        Self::send(self.request(Method::DELETE, url, scope)).await?;
        Ok(())
    }

    async fn create_folder(&self, scope: &Scope, folder: &NewFolder) -> ApiResult<Icon> {
        let url = self.endpoint("desktop/create_folder/")?;
        Self::send_json(self.request(Method::POST, url, scope).json(folder)).await
    }

    async fn create_link(&self, scope: &Scope, link: &NewLink) -> ApiResult<Icon> {
        let url = self.endpoint("desktop/create_link/")?;
        Self::send_json(self.request(Method::POST, url, scope).json(link)).await
    }
}

impl TenantApi for HttpApi {
    async fn list_tenants(&self) -> ApiResult<Vec<Tenant>> {
        let url = self.endpoint("tenants/")?;
        let envelope: ListEnvelope<Tenant> =
            Self::send_json(self.authorized(Method::GET, url)).await?;
        Ok(envelope.into_items())
    }

    async fn list_memberships(&self) -> ApiResult<Vec<Membership>> {
        let url = self.endpoint("memberships/")?;
        let envelope: ListEnvelope<Membership> =
            Self::send_json(self.authorized(Method::GET, url)).await?;
        Ok(envelope.into_items())
    }
}

impl SyncApi for HttpApi {
    async fn push(&self, scope: &Scope, request: &PushRequest) -> ApiResult<PushReport> {
        let url = self.endpoint("sync/push/")?;
        let envelope: DataEnvelope<PushReport> =
            Self::send_json(self.request(Method::POST, url, scope).json(request)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn pull(&self, scope: &Scope, request: &PullRequest) -> ApiResult<PullDataset> {
        let url = self.endpoint("sync/pull/")?;
        let envelope: DataEnvelope<PullDataset> =
            Self::send_json(self.request(Method::POST, url, scope).json(request)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn get_settings(&self, scope: &Scope) -> ApiResult<RemoteSettings> {
        let url = self.endpoint("sync/settings/")?;
        let envelope: DataEnvelope<RemoteSettings> =
            Self::send_json(self.request(Method::GET, url, scope)).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::Client("settings response did not include data".to_string()))
    }

    async fn update_settings(
        &self,
        scope: &Scope,
        update: &RemoteSettingsUpdate,
    ) -> ApiResult<RemoteSettings> {
        let url = self.endpoint("sync/settings/")?;
        let envelope: DataEnvelope<RemoteSettings> =
            Self::send_json(self.request(Method::PATCH, url, scope).json(update)).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::Client("settings response did not include data".to_string()))
    }
}
