use crate::commands::common::{
    format_pending_lines, pending_to_list_item, CommandContext, PendingListItem,
};
use crate::error::CliError;

pub async fn run_pending_list(context: &CommandContext, as_json: bool) -> Result<(), CliError> {
    let store = context.open_store().await?;
    let edits = store.get_pending_icon_updates(&context.scope).await?;

    if as_json {
        let json_items = edits
            .iter()
            .map(pending_to_list_item)
            .collect::<Vec<PendingListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_pending_lines(&edits) {
            println!("{line}");
        }
    }

    Ok(())
}
