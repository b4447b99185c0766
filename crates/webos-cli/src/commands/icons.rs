use webos_core::{DesktopController, FolderRef};

use crate::commands::common::{format_icon_lines, icon_to_list_item, CommandContext, IconListItem};
use crate::error::CliError;

pub async fn run_icons_list(context: &CommandContext, as_json: bool) -> Result<(), CliError> {
    let store = context.open_store().await?;
    let icons = store.get_icons(&context.scope).await?;

    if as_json {
        let json_items = icons
            .iter()
            .map(icon_to_list_item)
            .collect::<Vec<IconListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_icon_lines(&icons) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_icons_fetch(
    context: &CommandContext,
    folder: &str,
    as_json: bool,
) -> Result<(), CliError> {
    let folder = parse_folder(folder)?;
    let controller = DesktopController::new(
        context.scope.clone(),
        context.open_store().await?,
        context.api()?,
    );
    controller.fetch_icons(folder).await;
    let icons = controller.icons();

    if as_json {
        let json_items = icons
            .iter()
            .map(icon_to_list_item)
            .collect::<Vec<IconListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_icon_lines(&icons) {
            println!("{line}");
        }
    }

    Ok(())
}

pub fn parse_folder(raw: &str) -> Result<FolderRef, CliError> {
    raw.parse::<FolderRef>().map_err(|_| {
        CliError::Config(format!(
            "folder must be `root`, `recent`, a media kind or a category id (got '{raw}')"
        ))
    })
}
