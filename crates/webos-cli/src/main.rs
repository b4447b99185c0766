//! WebOS CLI - inspect and sync the desktop icon cache from a terminal

mod cli;
mod commands;
mod error;


use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands, ConfigCommands, IconCommands, PendingCommands, SettingsCommands};
use crate::commands::common::{resolve_config_path, CommandContext};
use crate::commands::completions::run_completions;
use crate::commands::config::{run_config_init, run_config_show, ConfigInitArgs};
use crate::commands::desktop::{
    run_create_folder, run_create_link, run_move, run_position, run_remove, run_rename, LinkArgs,
};
use crate::commands::icons::{run_icons_fetch, run_icons_list};
use crate::commands::pending::run_pending_list;
use crate::commands::settings::{
    run_settings_pull, run_settings_push, run_settings_reset, run_settings_set,
    run_settings_show,
};
use crate::commands::sync::run_sync;
use crate::commands::tenants::run_tenants;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("webos=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help().map_err(CliError::Io)?;
        println!();
        return Ok(());
    };

    let command = match command {
        Commands::Completions { shell, output } => {
            return run_completions(shell, output.as_deref());
        }
        Commands::Config {
            command:
                ConfigCommands::Init {
                    api_base_url,
                    access_token,
                    tenant_id,
                    user_id,
                    request_timeout_secs,
                    sync_interval_secs,
                },
        } => {
            return run_config_init(
                &resolve_config_path(cli.config),
                ConfigInitArgs {
                    api_base_url,
                    access_token,
                    tenant_id,
                    user_id,
                    request_timeout_secs,
                    sync_interval_secs,
                },
            );
        }
        command => command,
    };

    let context = CommandContext::resolve(
        cli.db_path,
        cli.config,
        cli.tenant.as_deref(),
        cli.user.as_deref(),
    )?;

    match command {
        Commands::Sync {
            watch,
            interval_secs,
            json,
        } => run_sync(&context, watch, interval_secs, json).await?,
        Commands::Icons { command } => match command {
            IconCommands::List { json } => run_icons_list(&context, json).await?,
            IconCommands::Fetch { folder, json } => {
                run_icons_fetch(&context, &folder, json).await?;
            }
        },
        Commands::Pending { command } => match command {
            PendingCommands::List { json } => run_pending_list(&context, json).await?,
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show { json } => run_settings_show(&context, json).await?,
            SettingsCommands::Set {
                upload_enabled,
                conflict_strategy,
                publish,
            } => {
                run_settings_set(&context, upload_enabled, conflict_strategy, publish).await?;
            }
            SettingsCommands::Pull => run_settings_pull(&context).await?,
            SettingsCommands::Push => run_settings_push(&context).await?,
            SettingsCommands::Reset => run_settings_reset(&context).await?,
        },
        Commands::Move { icon, target } => run_move(&context, icon, &target).await?,
        Commands::Position { icon, x, y } => run_position(&context, icon, x, y).await?,
        Commands::Rename { icon, name } => run_rename(&context, icon, &name).await?,
        Commands::Remove { icon } => run_remove(&context, icon).await?,
        Commands::Folder { name, x, y, parent } => {
            run_create_folder(&context, &name, x, y, &parent).await?;
        }
        Commands::Link {
            title,
            url,
            icon_class,
            x,
            y,
            parent,
        } => {
            run_create_link(
                &context,
                LinkArgs {
                    title,
                    url,
                    icon_class,
                    x,
                    y,
                    parent,
                },
            )
            .await?;
        }
        Commands::Tenants { json } => run_tenants(&context, json).await?,
        Commands::Config {
            command: ConfigCommands::Show { json },
        } => run_config_show(&context, json)?,
        Commands::Config {
            command: ConfigCommands::Init { .. },
        }
        | Commands::Completions { .. } => unreachable!("handled before the context is resolved"),
    }

    Ok(())
}
