use webos_core::api::{NewFolder, NewLink};
use webos_core::{DesktopController, DropOutcome, FolderRef, HttpApi, IconId};

use crate::commands::common::CommandContext;
use crate::commands::icons::parse_folder;
use crate::error::CliError;

/// Arguments of `webos link`
#[derive(Debug, Default)]
pub struct LinkArgs {
    pub title: String,
    pub url: String,
    pub icon_class: Option<String>,
    pub x: i64,
    pub y: i64,
    pub parent: String,
}

async fn controller(context: &CommandContext) -> Result<DesktopController<HttpApi>, CliError> {
    Ok(DesktopController::new(
        context.scope.clone(),
        context.open_store().await?,
        context.api()?,
    ))
}

/// A folder icons can be put into; smart folders only list.
pub fn parse_target(raw: &str) -> Result<FolderRef, CliError> {
    let folder = parse_folder(raw)?;
    if folder.accepts_icons() {
        Ok(folder)
    } else {
        Err(CliError::Config(format!(
            "`{folder}` only lists icons; use a category id or `root`"
        )))
    }
}

fn required(value: &str, what: &str) -> Result<String, CliError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CliError::Config(format!("{what} must not be empty")));
    }
    Ok(value.to_string())
}

pub async fn run_move(context: &CommandContext, icon: i64, target: &str) -> Result<(), CliError> {
    let target = parse_target(target)?;
    let controller = controller(context).await?;

    // The cached view tells whether the icon is the target folder itself
    if let Err(error) = controller.paint_cached().await {
        tracing::warn!("Cached icons unreadable: {}", error);
    }

    match controller.handle_drop(IconId::new(icon), target).await {
        DropOutcome::Ignored => println!("Icon {icon} is folder {target} itself, nothing to do"),
        DropOutcome::Moved => println!("Moved icon {icon} into folder {target}"),
        DropOutcome::RolledBack(message) => return Err(CliError::MoveRejected(message)),
    }
    Ok(())
}

pub async fn run_position(
    context: &CommandContext,
    icon: i64,
    x: i64,
    y: i64,
) -> Result<(), CliError> {
    let controller = controller(context).await?;

    controller.update_position(IconId::new(icon), x, y).await?;
    println!("Icon {icon} placed at ({x}, {y}); the change is queued for the next sync");
    Ok(())
}

pub async fn run_rename(context: &CommandContext, icon: i64, name: &str) -> Result<(), CliError> {
    let name = required(name, "name")?;
    controller(context)
        .await?
        .rename_icon(IconId::new(icon), &name)
        .await?;
    println!("Renamed icon {icon} to {name}");
    Ok(())
}

pub async fn run_remove(context: &CommandContext, icon: i64) -> Result<(), CliError> {
    controller(context)
        .await?
        .remove_icon(IconId::new(icon))
        .await?;
    println!("Removed icon {icon}");
    Ok(())
}

pub async fn run_create_folder(
    context: &CommandContext,
    name: &str,
    x: i64,
    y: i64,
    parent: &str,
) -> Result<(), CliError> {
    let folder = NewFolder {
        name: required(name, "name")?,
        x,
        y,
        parent_id: parse_target(parent)?,
    };
    let icon = controller(context).await?.create_folder(&folder).await?;
    println!("Created folder {} (icon {})", icon.title, icon.id);
    Ok(())
}

pub async fn run_create_link(context: &CommandContext, args: LinkArgs) -> Result<(), CliError> {
    let link = NewLink {
        title: required(&args.title, "title")?,
        link: required(&args.url, "url")?,
        icon_class: args
            .icon_class
            .map(|class| class.trim().to_string())
            .filter(|class| !class.is_empty()),
        x: args.x,
        y: args.y,
        parent_id: parse_target(&args.parent)?,
    };
    let icon = controller(context).await?.create_link(&link).await?;
    println!("Created link {} (icon {})", icon.title, icon.id);
    Ok(())
}
