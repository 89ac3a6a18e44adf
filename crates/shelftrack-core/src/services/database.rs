//! Shared database service wrapper used across clients.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::api::{SyncPlacement, SyncStyle};
use crate::db::{Database, InventoryRepository, SqliteInventoryRepository, SyncLogStatus};
use crate::models::{Color, InventoryItem, Placement, Style, SystemStats};
use crate::Result;

/// Thread-safe service for local store operations.
///
/// Wraps the `SQLite` connection so the sync engine and interactive
/// callers can share one store from async contexts.
#[derive(Debug, Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db = Database::open(db_path.into())?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Open an in-memory database service (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Merge incoming style records (full-replace of each style's colors).
    pub async fn upsert_styles(&self, styles: &[SyncStyle]) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteInventoryRepository::new(db.connection());
        repo.upsert_styles(styles)
    }

    /// Insert-or-replace placements by (style number, color).
    pub async fn upsert_placements(&self, placements: &[SyncPlacement]) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteInventoryRepository::new(db.connection());
        repo.upsert_placements(placements)
    }

    /// Look up a style by business key, ignoring case.
    pub async fn style_by_number(&self, style_number: &str) -> Result<Option<Style>> {
        let db = self.db.lock().await;
        let repo = SqliteInventoryRepository::new(db.connection());
        repo.style_by_number(style_number)
    }

    /// List colors owned by a style.
    pub async fn colors_for_style(&self, style_id: i64) -> Result<Vec<Color>> {
        let db = self.db.lock().await;
        let repo = SqliteInventoryRepository::new(db.connection());
        repo.colors_for_style(style_id)
    }

    /// Fetch a placement by its composite business key.
    pub async fn placement_by_key(
        &self,
        style_number: &str,
        color: &str,
    ) -> Result<Option<Placement>> {
        let db = self.db.lock().await;
        let repo = SqliteInventoryRepository::new(db.connection());
        repo.placement_by_key(style_number, color)
    }

    /// List placements joined with style attributes, newest first.
    pub async fn list_inventory(&self, limit: usize) -> Result<Vec<InventoryItem>> {
        let db = self.db.lock().await;
        let repo = SqliteInventoryRepository::new(db.connection());
        repo.list_inventory(limit)
    }

    /// Local aggregate counts.
    pub async fn stats(&self) -> Result<SystemStats> {
        let db = self.db.lock().await;
        let repo = SqliteInventoryRepository::new(db.connection());
        repo.stats()
    }

    /// Timestamp of the last fully-successful sync, if any.
    pub async fn latest_watermark(&self) -> Result<Option<DateTime<Utc>>> {
        let db = self.db.lock().await;
        let repo = SqliteInventoryRepository::new(db.connection());
        repo.latest_watermark()
    }

    /// Append a sync outcome marker.
    pub async fn record_sync(
        &self,
        at: DateTime<Utc>,
        device_id: &str,
        status: SyncLogStatus,
    ) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteInventoryRepository::new(db.connection());
        repo.record_sync(at, device_id, status)
    }
}
