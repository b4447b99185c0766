use webos_core::models::ConflictStrategy;
use webos_core::{SyncEngine, SyncSettings};

use crate::commands::common::{format_timestamp, CommandContext};
use crate::error::CliError;

pub fn format_settings_lines(settings: &SyncSettings) -> Vec<String> {
    vec![
        format!(
            "Upload enabled:    {}",
            if settings.upload_enabled { "yes" } else { "no" }
        ),
        format!("Conflict strategy: {}", settings.conflict_strategy),
        format!(
            "Last sync:         {}",
            format_timestamp(settings.last_sync_at)
        ),
    ]
}

fn print_settings(settings: &SyncSettings) {
    for line in format_settings_lines(settings) {
        println!("{line}");
    }
}

pub async fn run_settings_show(context: &CommandContext, as_json: bool) -> Result<(), CliError> {
    let engine = SyncEngine::new(context.open_store().await?, context.api()?);
    let settings = engine.load_settings(&context.scope).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print_settings(&settings);
    }
    Ok(())
}

/// Apply the given changes to `settings`; `Err` when there is nothing to apply.
pub fn apply_settings_changes(
    settings: &mut SyncSettings,
    upload_enabled: Option<bool>,
    conflict_strategy: Option<String>,
) -> Result<(), CliError> {
    let conflict_strategy = webos_core::util::normalize_text_option(conflict_strategy);
    if upload_enabled.is_none() && conflict_strategy.is_none() {
        return Err(CliError::NothingToChange);
    }

    if let Some(upload_enabled) = upload_enabled {
        settings.upload_enabled = upload_enabled;
    }
    if let Some(name) = conflict_strategy {
        settings.conflict_strategy = ConflictStrategy::from(name);
    }
    Ok(())
}

pub async fn run_settings_set(
    context: &CommandContext,
    upload_enabled: Option<bool>,
    conflict_strategy: Option<String>,
    publish: bool,
) -> Result<(), CliError> {
    let engine = SyncEngine::new(context.open_store().await?, context.api()?);
    let mut settings = engine.load_settings(&context.scope).await?;
    apply_settings_changes(&mut settings, upload_enabled, conflict_strategy)?;

    let settings = if publish {
        engine.publish_settings(&context.scope, &settings).await?
    } else {
        engine.save_settings(&context.scope, &settings).await?;
        settings
    };

    print_settings(&settings);
    Ok(())
}

pub async fn run_settings_pull(context: &CommandContext) -> Result<(), CliError> {
    let engine = SyncEngine::new(context.open_store().await?, context.api()?);
    let settings = engine.refresh_settings_from_server(&context.scope).await?;
    print_settings(&settings);
    Ok(())
}

pub async fn run_settings_push(context: &CommandContext) -> Result<(), CliError> {
    let engine = SyncEngine::new(context.open_store().await?, context.api()?);
    let settings = engine.load_settings(&context.scope).await?;
    let settings = engine.publish_settings(&context.scope, &settings).await?;
    print_settings(&settings);
    Ok(())
}

pub async fn run_settings_reset(context: &CommandContext) -> Result<(), CliError> {
    let engine = SyncEngine::new(context.open_store().await?, context.api()?);
    let settings = engine.reset_last_sync(&context.scope).await?;
    print_settings(&settings);
    Ok(())
}
