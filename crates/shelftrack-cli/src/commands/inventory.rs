use crate::commands::common::{format_inventory_lines, open_store, AppPaths};
use crate::error::CliError;

pub async fn run_inventory(limit: usize, as_json: bool, paths: &AppPaths) -> Result<(), CliError> {
    let store = open_store(paths)?;
    let items = store.list_inventory(limit).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No showroom inventory. Run `shelftrack sync` to pull the catalog.");
        return Ok(());
    }

    for line in format_inventory_lines(&items) {
        println!("{line}");
    }
    Ok(())
}
