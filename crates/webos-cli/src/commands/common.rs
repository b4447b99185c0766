use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use webos_core::models::{IconKind, PendingEdit};
use webos_core::{ClientConfig, ConfigFile, HttpApi, Icon, LocalStore, Scope};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";

/// Everything a command needs: where the cache lives, the resolved client
/// configuration and the scope to act for.
#[derive(Debug)]
pub struct CommandContext {
    pub db_path: PathBuf,
    pub config_path: PathBuf,
    pub config: ClientConfig,
    pub scope: Scope,
}

impl CommandContext {
    pub fn resolve(
        db_path: Option<PathBuf>,
        config_path: Option<PathBuf>,
        tenant: Option<&str>,
        user: Option<&str>,
    ) -> Result<Self, CliError> {
        let config_path = resolve_config_path(config_path);
        let file = ConfigFile::load_from_path(&config_path)?;
        let config = ClientConfig::from_env(&file)?;
        let scope = resolve_scope(&config, tenant, user);

        Ok(Self {
            db_path: resolve_db_path(db_path),
            config_path,
            config,
            scope,
        })
    }

    pub async fn open_store(&self) -> Result<LocalStore, CliError> {
        Ok(LocalStore::open_path(&self.db_path).await?)
    }

    pub fn api(&self) -> Result<HttpApi, CliError> {
        Ok(HttpApi::new(&self.config)?)
    }
}

/// Flags win over the configured tenant and user.
pub fn resolve_scope(config: &ClientConfig, tenant: Option<&str>, user: Option<&str>) -> Scope {
    Scope::from_options(
        tenant
            .map(str::to_string)
            .or_else(|| config.tenant_id.clone()),
        user.map(str::to_string).or_else(|| config.user_id.clone()),
    )
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("WEBOS_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("webos")
        .join("cache.db")
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> PathBuf {
    cli_config_path
        .or_else(|| env::var_os("WEBOS_CONFIG").map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("webos")
        .join(CONFIG_FILE_NAME)
}

#[derive(Debug, Serialize)]
pub struct IconListItem {
    pub id: i64,
    pub title: String,
    pub kind: String,
    pub x: i64,
    pub y: i64,
    pub folder: bool,
}

pub fn icon_to_list_item(icon: &Icon) -> IconListItem {
    IconListItem {
        id: icon.id.get(),
        title: icon.title.clone(),
        kind: icon
            .kind
            .as_ref()
            .map_or("unknown", IconKind::as_str)
            .to_string(),
        x: icon.x,
        y: icon.y,
        folder: icon.is_folder(),
    }
}

pub fn format_icon_lines(icons: &[Icon]) -> Vec<String> {
    if icons.is_empty() {
        return vec!["No icons cached.".to_string()];
    }

    icons
        .iter()
        .map(|icon| {
            let marker = if icon.is_folder() { "/" } else { "" };
            format!(
                "{:>6}  ({:>4}, {:>4})  {}{}",
                icon.id.get(),
                icon.x,
                icon.y,
                icon.title,
                marker
            )
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct PendingListItem {
    pub queue_id: i64,
    pub icon_id: i64,
    pub x: i64,
    pub y: i64,
    pub updated_at: DateTime<Utc>,
}

pub fn pending_to_list_item(edit: &PendingEdit) -> PendingListItem {
    PendingListItem {
        queue_id: edit.id,
        icon_id: edit.payload.id.get(),
        x: edit.payload.x,
        y: edit.payload.y,
        updated_at: edit.payload.updated_at,
    }
}

pub fn format_pending_lines(edits: &[PendingEdit]) -> Vec<String> {
    if edits.is_empty() {
        return vec!["No pending edits.".to_string()];
    }

    edits
        .iter()
        .map(|edit| {
            format!(
                "#{:<5} icon {} -> ({}, {}) at {}",
                edit.id,
                edit.payload.id,
                edit.payload.x,
                edit.payload.y,
                format_timestamp(Some(edit.payload.updated_at))
            )
        })
        .collect()
}

pub fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(
        || "never".to_string(),
        |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
