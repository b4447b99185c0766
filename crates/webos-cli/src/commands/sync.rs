use std::time::Duration;

use tokio::sync::watch;
use webos_core::{SyncEngine, SyncReport};

use crate::commands::common::{format_timestamp, CommandContext};
use crate::error::CliError;

pub async fn run_sync(
    context: &CommandContext,
    watch_mode: bool,
    interval_secs: Option<u64>,
    as_json: bool,
) -> Result<(), CliError> {
    let engine = SyncEngine::new(context.open_store().await?, context.api()?);

    if watch_mode {
        let interval = resolve_interval(interval_secs, context.config.sync_interval)?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown_tx.send(true).ok();
            }
        });

        let settled = engine
            .run_periodic(&context.scope, interval, shutdown_rx)
            .await;
        println!("Stopped after {settled} completed sync cycles");
        return Ok(());
    }

    let report = engine.sync_now(&context.scope).await?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in format_sync_report(&report) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn resolve_interval(
    interval_secs: Option<u64>,
    configured: Duration,
) -> Result<Duration, CliError> {
    match interval_secs {
        Some(0) => Err(CliError::Config(
            "--interval-secs must be greater than zero".to_string(),
        )),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Ok(configured),
    }
}

pub fn format_sync_report(report: &SyncReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(error) = &report.push_error {
        lines.push(format!(
            "Push failed, edits stay queued: {}",
            error.user_message()
        ));
    } else if let Some(push) = &report.push_report {
        lines.push(format!(
            "Pushed {} edits ({} updated, {} skipped)",
            report.pushed, push.updated, push.skipped
        ));
    } else if !report.settings.upload_enabled {
        lines.push("Upload disabled, nothing pushed".to_string());
    }

    match report.pulled_icons {
        Some(count) => lines.push(format!("Pulled {count} icons")),
        None => lines.push("Pull returned no icon data, cache unchanged".to_string()),
    }
    lines.push(format!(
        "Last sync: {}",
        format_timestamp(report.settings.last_sync_at)
    ));
    lines
}
