use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use shelftrack_core::api::GatewayClient;
use shelftrack_core::config::ClientConfig;
use shelftrack_core::models::InventoryItem;
use shelftrack_core::queue::{PendingChange, PendingQueue};
use shelftrack_core::services::DatabaseService;
use shelftrack_core::sync::SyncEngine;

use crate::error::CliError;

/// File locations under the resolved data directory.
pub struct AppPaths {
    pub database: PathBuf,
    pub queue: PathBuf,
    pub config: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database: data_dir.join("shelftrack.db"),
            queue: data_dir.join("pending.json"),
            config: data_dir.join("config.json"),
        }
    }
}

pub fn resolve_data_dir(cli_data_dir: Option<PathBuf>) -> PathBuf {
    cli_data_dir
        .or_else(|| env::var_os("SHELFTRACK_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(default_data_dir)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shelftrack")
}

pub fn load_config(paths: &AppPaths) -> Result<ClientConfig, CliError> {
    Ok(ClientConfig::load_or_init(&paths.config)?)
}

pub fn open_store(paths: &AppPaths) -> Result<DatabaseService, CliError> {
    Ok(DatabaseService::open_path(&paths.database)?)
}

pub fn open_queue(paths: &AppPaths) -> PendingQueue {
    PendingQueue::open(&paths.queue)
}

/// Build a sync engine against the configured endpoint.
///
/// Fails up front when no endpoint has been configured; every network
/// command goes through here.
pub async fn open_engine(paths: &AppPaths) -> Result<SyncEngine<GatewayClient>, CliError> {
    let config = load_config(paths)?;
    let endpoint = config.backend_url.ok_or(CliError::NoEndpoint)?;

    let gateway = GatewayClient::new(endpoint)?;
    let store = open_store(paths)?;
    let queue = open_queue(paths);

    Ok(SyncEngine::new(gateway, store, queue, config.device_id).await?)
}

pub fn format_inventory_lines(items: &[InventoryItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let shelf = item.shelf_location.as_deref().unwrap_or("-");
            let division = item.division.as_deref().unwrap_or("-");
            format!(
                "{:<10}  {:<16}  {:<6}  {:<5}  {division}",
                item.style_number,
                item.color,
                shelf,
                item.status.as_str()
            )
        })
        .collect()
}

pub fn format_queue_lines(changes: &[PendingChange]) -> Vec<String> {
    changes
        .iter()
        .map(|change| {
            format!(
                "{}  {:?}  queued {}",
                change.id,
                change.change_type,
                format_sync_timestamp(change.queued_at)
            )
        })
        .collect()
}

pub fn format_sync_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shelftrack_core::models::ItemStatus;
    use shelftrack_core::queue::PendingChangeType;

    use super::*;

    #[test]
    fn app_paths_live_under_the_data_dir() {
        let paths = AppPaths::new(PathBuf::from("/tmp/st"));
        assert_eq!(paths.database, PathBuf::from("/tmp/st/shelftrack.db"));
        assert_eq!(paths.queue, PathBuf::from("/tmp/st/pending.json"));
        assert_eq!(paths.config, PathBuf::from("/tmp/st/config.json"));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/custom")));
        assert_eq!(dir, PathBuf::from("/tmp/custom"));
    }

    #[test]
    fn inventory_lines_show_placeholder_for_missing_fields() {
        let items = vec![InventoryItem {
            id: 1,
            style_number: "12345".to_string(),
            color: "Black".to_string(),
            status: ItemStatus::Keep,
            division: None,
            gender: None,
            shelf_location: None,
        }];

        let lines = format_inventory_lines(&items);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("12345"));
        assert!(lines[0].contains("keep"));
        assert!(lines[0].contains('-'));
    }

    #[test]
    fn queue_lines_include_id_and_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let queue = PendingQueue::open(tmp.path().join("pending.json"));
        let change = queue.enqueue(
            PendingChangeType::Classification,
            serde_json::json!({"style_number": "12345"}),
        );

        let lines = format_queue_lines(&queue.snapshot());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(&change.id.to_string()));
        assert!(lines[0].contains("Classification"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn open_engine_requires_an_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(tmp.path().to_path_buf());

        let error = open_engine(&paths).await.unwrap_err();
        assert!(matches!(error, CliError::NoEndpoint));
    }
}
