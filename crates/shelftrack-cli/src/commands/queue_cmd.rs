use crate::commands::common::{format_queue_lines, open_queue, AppPaths};
use crate::error::CliError;

pub fn run_queue_list(as_json: bool, paths: &AppPaths) -> Result<(), CliError> {
    let queue = open_queue(paths);
    let changes = queue.snapshot();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
        return Ok(());
    }

    if changes.is_empty() {
        println!("Queue is empty.");
        return Ok(());
    }

    for line in format_queue_lines(&changes) {
        println!("{line}");
    }
    Ok(())
}
