//! Client configuration.
//!
//! Values come from an optional JSON file and are overridden by `WEBOS_*`
//! environment variables. Everything is trimmed and validated once here so
//! the rest of the crate can trust a [`ClientConfig`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Scope;
use crate::util::{is_http_url, normalize_text_option};

pub const ENV_API_BASE: &str = "WEBOS_API_BASE";
pub const ENV_ACCESS_TOKEN: &str = "WEBOS_ACCESS_TOKEN";
pub const ENV_TENANT_ID: &str = "WEBOS_TENANT_ID";
pub const ENV_USER_ID: &str = "WEBOS_USER_ID";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "WEBOS_HTTP_TIMEOUT_SECS";
pub const ENV_SYNC_INTERVAL_SECS: &str = "WEBOS_SYNC_INTERVAL_SECS";

/// On-disk configuration; every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub sync_interval_secs: Option<u64>,
}

impl ConfigFile {
    /// Load from `path`; a missing file yields the empty config.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "failed to parse config at {}: {error}",
                path.display()
            ))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        std::fs::write(path, serde_json::to_string_pretty(&normalized)?)?;
        Ok(())
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_text_option(self.api_base_url.take());
        self.access_token = normalize_text_option(self.access_token.take());
        self.tenant_id = normalize_text_option(self.tenant_id.take());
        self.user_id = normalize_text_option(self.user_id.take());
    }
}

/// Fully resolved client settings
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    pub request_timeout: Duration,
    pub sync_interval: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("tenant_id", &self.tenant_id)
            .field("user_id", &self.user_id)
            .field("request_timeout", &self.request_timeout)
            .field("sync_interval", &self.sync_interval)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            access_token: None,
            tenant_id: None,
            user_id: None,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            sync_interval: Self::DEFAULT_SYNC_INTERVAL,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_API_BASE_URL: &'static str = "http://127.0.0.1:8000/api";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);

    /// Resolve from the file and the process environment.
    pub fn from_env(file: &ConfigFile) -> Result<Self> {
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Resolve from the file and an environment lookup; the environment wins.
    pub fn resolve(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pick = |key: &str, fallback: &Option<String>| {
            normalize_text_option(env(key)).or_else(|| normalize_text_option(fallback.clone()))
        };

        let api_base_url = pick(ENV_API_BASE, &file.api_base_url)
            .unwrap_or_else(|| Self::DEFAULT_API_BASE_URL.to_string());
        if !is_http_url(&api_base_url) {
            return Err(Error::Config(format!(
                "API base URL must include http:// or https:// (got '{api_base_url}')"
            )));
        }

        let request_timeout = parse_secs(
            ENV_HTTP_TIMEOUT_SECS,
            env(ENV_HTTP_TIMEOUT_SECS),
            file.request_timeout_secs,
        )?
        .unwrap_or(Self::DEFAULT_REQUEST_TIMEOUT);
        let sync_interval = parse_secs(
            ENV_SYNC_INTERVAL_SECS,
            env(ENV_SYNC_INTERVAL_SECS),
            file.sync_interval_secs,
        )?
        .unwrap_or(Self::DEFAULT_SYNC_INTERVAL);

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            access_token: pick(ENV_ACCESS_TOKEN, &file.access_token),
            tenant_id: pick(ENV_TENANT_ID, &file.tenant_id),
            user_id: pick(ENV_USER_ID, &file.user_id),
            request_timeout,
            sync_interval,
        })
    }

    /// Scope implied by the configured tenant and user
    pub fn scope(&self) -> Scope {
        Scope::from_options(self.tenant_id.clone(), self.user_id.clone())
    }
}

fn parse_secs(key: &str, raw: Option<String>, fallback: Option<u64>) -> Result<Option<Duration>> {
    let secs = match normalize_text_option(raw) {
        Some(value) => Some(
            value
                .parse::<u64>()
                .map_err(|_| Error::Config(format!("{key} must be a whole number of seconds")))?,
        ),
        None => fallback,
    };

    match secs {
        Some(0) => Err(Error::Config(format!("{key} must be greater than zero"))),
        Some(secs) => Ok(Some(Duration::from_secs(secs))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let config = ClientConfig::resolve(&ConfigFile::default(), env_of(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.scope(), Scope::default());
    }

    #[test]
    fn env_overrides_file() {
        let file = ConfigFile {
            api_base_url: Some("https://file.example.com/api/".to_string()),
            tenant_id: Some("file-tenant".to_string()),
            user_id: Some("3".to_string()),
            request_timeout_secs: Some(5),
            ..ConfigFile::default()
        };
        let config = ClientConfig::resolve(
            &file,
            env_of(&[
                (ENV_API_BASE, " https://env.example.com/api "),
                (ENV_TENANT_ID, "env-tenant"),
                (ENV_SYNC_INTERVAL_SECS, "15"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://env.example.com/api");
        assert_eq!(config.tenant_id.as_deref(), Some("env-tenant"));
        assert_eq!(config.user_id.as_deref(), Some("3"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.sync_interval, Duration::from_secs(15));
        assert_eq!(config.scope(), Scope::new("env-tenant", "3"));
    }

    #[test]
    fn rejects_invalid_values() {
        let bad_url = ClientConfig::resolve(
            &ConfigFile::default(),
            env_of(&[(ENV_API_BASE, "api.example.com")]),
        );
        assert!(matches!(bad_url, Err(Error::Config(_))));

        let bad_timeout = ClientConfig::resolve(
            &ConfigFile::default(),
            env_of(&[(ENV_HTTP_TIMEOUT_SECS, "soon")]),
        );
        assert!(matches!(bad_timeout, Err(Error::Config(_))));

        let zero_interval = ClientConfig::resolve(
            &ConfigFile {
                sync_interval_secs: Some(0),
                ..ConfigFile::default()
            },
            env_of(&[]),
        );
        assert!(matches!(zero_interval, Err(Error::Config(_))));
    }

    #[test]
    fn debug_redacts_access_token() {
        let config = ClientConfig {
            access_token: Some("secret-token".to_string()),
            ..ClientConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn config_file_roundtrip_normalizes_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("webos").join("config.json");

        let file = ConfigFile {
            api_base_url: Some(" https://example.com/api ".to_string()),
            access_token: Some("   ".to_string()),
            tenant_id: Some(" acme ".to_string()),
            ..ConfigFile::default()
        };
        file.save_to_path(&path).unwrap();

        let loaded = ConfigFile::load_from_path(&path).unwrap();
        assert_eq!(loaded.api_base_url.as_deref(), Some("https://example.com/api"));
        assert_eq!(loaded.access_token, None);
        assert_eq!(loaded.tenant_id.as_deref(), Some("acme"));
    }

    #[test]
    fn config_file_rejects_unknown_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url": "https://x", "theme": "dark"}"#).unwrap();

        let error = ConfigFile::load_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }

    #[test]
    fn missing_config_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded = ConfigFile::load_from_path(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(loaded, ConfigFile::default());
    }
}
