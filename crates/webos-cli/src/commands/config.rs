use std::path::Path;

use serde::Serialize;
use webos_core::util::normalize_text_option;
use webos_core::{ClientConfig, ConfigFile};

use crate::commands::common::CommandContext;
use crate::error::CliError;

#[derive(Debug, Default)]
pub struct ConfigInitArgs {
    pub api_base_url: Option<String>,
    pub access_token: Option<String>,
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub sync_interval_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub config_path: String,
    pub db_path: String,
    pub api_base_url: String,
    pub access_token: Option<&'static str>,
    pub tenant_id: String,
    pub user_id: String,
    pub request_timeout_secs: u64,
    pub sync_interval_secs: u64,
}

pub fn config_summary(context: &CommandContext) -> ConfigSummary {
    ConfigSummary {
        config_path: context.config_path.display().to_string(),
        db_path: context.db_path.display().to_string(),
        api_base_url: context.config.api_base_url.clone(),
        access_token: context.config.access_token.as_ref().map(|_| "[REDACTED]"),
        tenant_id: context.scope.tenant_id().to_string(),
        user_id: context.scope.user_id().to_string(),
        request_timeout_secs: context.config.request_timeout.as_secs(),
        sync_interval_secs: context.config.sync_interval.as_secs(),
    }
}

pub fn run_config_show(context: &CommandContext, as_json: bool) -> Result<(), CliError> {
    let summary = config_summary(context);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Config file:     {}", summary.config_path);
    println!("Cache database:  {}", summary.db_path);
    println!("API base URL:    {}", summary.api_base_url);
    println!(
        "Access token:    {}",
        summary.access_token.unwrap_or("(not set)")
    );
    println!("Scope:           {}", context.scope);
    println!("Request timeout: {}s", summary.request_timeout_secs);
    println!("Sync interval:   {}s", summary.sync_interval_secs);
    Ok(())
}

/// Overlay `args` on `existing` and validate the result.
pub fn merge_config_file(existing: ConfigFile, args: ConfigInitArgs) -> Result<ConfigFile, CliError> {
    let merged = ConfigFile {
        api_base_url: normalize_text_option(args.api_base_url).or(existing.api_base_url),
        access_token: normalize_text_option(args.access_token).or(existing.access_token),
        tenant_id: normalize_text_option(args.tenant_id).or(existing.tenant_id),
        user_id: normalize_text_option(args.user_id).or(existing.user_id),
        request_timeout_secs: args.request_timeout_secs.or(existing.request_timeout_secs),
        sync_interval_secs: args.sync_interval_secs.or(existing.sync_interval_secs),
    };

    // Validate the file on its own, without environment overrides
    ClientConfig::resolve(&merged, |_| None).map_err(|error| CliError::Config(error.to_string()))?;
    Ok(merged)
}

pub fn run_config_init(config_path: &Path, args: ConfigInitArgs) -> Result<(), CliError> {
    // Unreadable files get replaced
    let existing = match ConfigFile::load_from_path(config_path) {
        Ok(existing) => existing,
        Err(error) => {
            tracing::warn!(
                "Ignoring unreadable config at {}: {}",
                config_path.display(),
                error
            );
            ConfigFile::default()
        }
    };

    let merged = merge_config_file(existing, args)?;
    merged.save_to_path(config_path)?;
    println!("Config saved to {}", config_path.display());
    Ok(())
}
