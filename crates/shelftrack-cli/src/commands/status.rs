use crate::commands::common::{
    format_sync_timestamp, load_config, open_queue, open_store, AppPaths,
};
use crate::error::CliError;

/// Offline status summary; never touches the network.
pub async fn run_status(paths: &AppPaths) -> Result<(), CliError> {
    let config = load_config(paths)?;
    let store = open_store(paths)?;
    let queue = open_queue(paths);

    let watermark = store.latest_watermark().await?;
    let stats = store.stats().await?;

    println!("Device:    {}", config.device_id);
    println!(
        "Endpoint:  {}",
        config.backend_url.as_deref().unwrap_or("(not configured)")
    );
    println!(
        "Last sync: {}",
        watermark.map_or_else(|| "never".to_string(), format_sync_timestamp)
    );
    println!("Pending:   {} queued changes", queue.len());
    println!(
        "Local:     {} styles, {} showroom items, {} awaiting approval",
        stats.total_styles, stats.showroom_count, stats.pending_approvals
    );

    Ok(())
}
