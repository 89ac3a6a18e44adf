//! Inventory repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::api::{SyncPlacement, SyncStyle};
use crate::error::Result;
use crate::models::{Color, InventoryItem, ItemStatus, Placement, Style, SystemStats};
use crate::util::unix_millis_now;

/// Outcome marker recorded in the sync log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncLogStatus {
    Success,
    Failed,
}

impl SyncLogStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// Trait for local inventory storage operations
pub trait InventoryRepository {
    /// Look up a style by business key, ignoring case
    fn style_by_number(&self, style_number: &str) -> Result<Option<Style>>;

    /// List colors owned by a style
    fn colors_for_style(&self, style_id: i64) -> Result<Vec<Color>>;

    /// Merge incoming style records (full-replace of each style's colors)
    fn upsert_styles(&self, styles: &[SyncStyle]) -> Result<()>;

    /// Insert-or-replace placements by (style number, color)
    fn upsert_placements(&self, placements: &[SyncPlacement]) -> Result<()>;

    /// Fetch a placement by its composite business key
    fn placement_by_key(&self, style_number: &str, color: &str) -> Result<Option<Placement>>;

    /// List placements joined with style attributes, newest first
    fn list_inventory(&self, limit: usize) -> Result<Vec<InventoryItem>>;

    /// Local aggregate counts
    fn stats(&self) -> Result<SystemStats>;

    /// Timestamp of the last fully-successful sync, if any
    fn latest_watermark(&self) -> Result<Option<DateTime<Utc>>>;

    /// Append a sync outcome marker
    fn record_sync(
        &self,
        at: DateTime<Utc>,
        device_id: &str,
        status: SyncLogStatus,
    ) -> Result<()>;
}

/// `SQLite` implementation of `InventoryRepository`
pub struct SqliteInventoryRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteInventoryRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_style(row: &rusqlite::Row<'_>) -> rusqlite::Result<Style> {
        Ok(Style {
            id: row.get(0)?,
            style_number: row.get(1)?,
            division: row.get(2)?,
            gender: row.get(3)?,
            outsole: row.get(4)?,
            source_file_ids: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn parse_color(row: &rusqlite::Row<'_>) -> rusqlite::Result<Color> {
        Ok(Color {
            id: row.get(0)?,
            style_id: row.get(1)?,
            color_name: row.get(2)?,
            source_file_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn parse_placement(row: &rusqlite::Row<'_>) -> rusqlite::Result<Placement> {
        let status: String = row.get(4)?;
        Ok(Placement {
            id: row.get(0)?,
            style_number: row.get(1)?,
            color: row.get(2)?,
            shelf_location: row.get(3)?,
            status: status.parse().unwrap_or(ItemStatus::Drop),
            manager_approved: row.get::<_, i32>(5)? != 0,
            placed_at: row.get(6)?,
        })
    }

    fn insert_colors(&self, style_id: i64, colors: &[String]) -> Result<()> {
        let now = unix_millis_now();
        for color in colors {
            self.conn.execute(
                "INSERT INTO colors (style_id, color_name, created_at) VALUES (?, ?, ?)",
                params![style_id, color, now],
            )?;
        }
        Ok(())
    }
}

impl InventoryRepository for SqliteInventoryRepository<'_> {
    fn style_by_number(&self, style_number: &str) -> Result<Option<Style>> {
        let result = self.conn.query_row(
            "SELECT id, style_number, division, gender, outsole, source_file_ids,
                    created_at, updated_at
             FROM styles WHERE style_number = ? COLLATE NOCASE",
            params![style_number],
            Self::parse_style,
        );

        match result {
            Ok(style) => Ok(Some(style)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn colors_for_style(&self, style_id: i64) -> Result<Vec<Color>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, style_id, color_name, source_file_id, created_at
             FROM colors WHERE style_id = ? ORDER BY id",
        )?;

        let colors = stmt
            .query_map(params![style_id], Self::parse_color)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(colors)
    }

    fn upsert_styles(&self, styles: &[SyncStyle]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let now = unix_millis_now();

        for style in styles {
            let existing = self.style_by_number(&style.style_number)?;

            if let Some(existing) = existing {
                self.conn.execute(
                    "UPDATE styles SET division = ?, gender = ?, outsole = ?, updated_at = ?
                     WHERE id = ?",
                    params![
                        style.division,
                        style.gender,
                        style.outsole,
                        now,
                        existing.id
                    ],
                )?;

                // Server is authoritative for the full color list
                self.conn.execute(
                    "DELETE FROM colors WHERE style_id = ?",
                    params![existing.id],
                )?;
                self.insert_colors(existing.id, &style.colors)?;
            } else {
                self.conn.execute(
                    "INSERT INTO styles (style_number, division, gender, outsole,
                                         source_file_ids, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                    params![
                        style.style_number,
                        style.division,
                        style.gender,
                        style.outsole,
                        serde_json::to_string(&style.source_file_ids)?,
                        now,
                        now
                    ],
                )?;

                let style_id = self.conn.last_insert_rowid();
                self.insert_colors(style_id, &style.colors)?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn upsert_placements(&self, placements: &[SyncPlacement]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let now = unix_millis_now();

        // Delta placements represent already-approved shelf assignments
        for placement in placements {
            self.conn.execute(
                "INSERT OR REPLACE INTO placements
                     (style_number, color, shelf_location, status, manager_approved, placed_at)
                 VALUES (?, ?, ?, 'keep', 1, ?)",
                params![
                    placement.style_number,
                    placement.color,
                    placement.shelf_location,
                    now
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn placement_by_key(&self, style_number: &str, color: &str) -> Result<Option<Placement>> {
        let result = self.conn.query_row(
            "SELECT id, style_number, color, shelf_location, status, manager_approved, placed_at
             FROM placements WHERE style_number = ? AND color = ?",
            params![style_number, color],
            Self::parse_placement,
        );

        match result {
            Ok(placement) => Ok(Some(placement)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_inventory(&self, limit: usize) -> Result<Vec<InventoryItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.style_number, p.color, p.status, p.shelf_location,
                    s.division, s.gender
             FROM placements p
             LEFT JOIN styles s ON p.style_number = s.style_number COLLATE NOCASE
             ORDER BY p.placed_at DESC
             LIMIT ?",
        )?;

        let items = stmt
            .query_map(params![limit as i64], |row| {
                let status: String = row.get(3)?;
                Ok(InventoryItem {
                    id: row.get(0)?,
                    style_number: row.get(1)?,
                    color: row.get(2)?,
                    status: status.parse().unwrap_or(ItemStatus::Drop),
                    shelf_location: row.get(4)?,
                    division: row.get(5)?,
                    gender: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(items)
    }

    fn stats(&self) -> Result<SystemStats> {
        let total_styles: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM styles", [], |row| row.get(0))?;
        let showroom_count: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM placements WHERE status = 'keep'",
            [],
            |row| row.get(0),
        )?;
        let pending_approvals: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM placements WHERE manager_approved = 0",
            [],
            |row| row.get(0),
        )?;

        Ok(SystemStats {
            total_styles,
            showroom_count,
            pending_approvals,
        })
    }

    fn latest_watermark(&self) -> Result<Option<DateTime<Utc>>> {
        let result = self.conn.query_row(
            "SELECT last_sync_timestamp FROM sync_log
             WHERE sync_status = 'success'
             ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get::<_, String>(0),
        );

        let raw = match result {
            Ok(raw) => raw,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => Ok(Some(parsed.with_timezone(&Utc))),
            Err(error) => {
                tracing::warn!("Ignoring unparseable sync watermark '{raw}': {error}");
                Ok(None)
            }
        }
    }

    fn record_sync(
        &self,
        at: DateTime<Utc>,
        device_id: &str,
        status: SyncLogStatus,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sync_log (last_sync_timestamp, device_id, sync_status)
             VALUES (?, ?, ?)",
            params![at.to_rfc3339(), device_id, status.as_str()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn style(number: &str, colors: &[&str]) -> SyncStyle {
        SyncStyle {
            id: 0,
            style_number: number.to_string(),
            division: Some("Performance".to_string()),
            gender: Some("Womens".to_string()),
            outsole: None,
            colors: colors.iter().map(ToString::to_string).collect(),
            source_file_ids: vec![],
            updated_at: String::new(),
        }
    }

    fn placement(number: &str, color: &str, shelf: &str) -> SyncPlacement {
        SyncPlacement {
            id: 0,
            style_number: number.to_string(),
            color: color.to_string(),
            shelf_location: Some(shelf.to_string()),
        }
    }

    #[test]
    fn upsert_styles_inserts_with_colors() {
        let db = setup();
        let repo = SqliteInventoryRepository::new(db.connection());

        repo.upsert_styles(&[style("12345", &["Red", "Blue"])]).unwrap();

        let stored = repo.style_by_number("12345").unwrap().unwrap();
        assert_eq!(stored.division.as_deref(), Some("Performance"));

        let colors = repo.colors_for_style(stored.id).unwrap();
        let names: Vec<_> = colors.iter().map(|c| c.color_name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Blue"]);
    }

    #[test]
    fn upsert_styles_replaces_color_set() {
        let db = setup();
        let repo = SqliteInventoryRepository::new(db.connection());

        repo.upsert_styles(&[style("12345", &["Red", "Blue"])]).unwrap();
        repo.upsert_styles(&[style("12345", &["Green"])]).unwrap();

        let stored = repo.style_by_number("12345").unwrap().unwrap();
        let colors = repo.colors_for_style(stored.id).unwrap();
        let names: Vec<_> = colors.iter().map(|c| c.color_name.as_str()).collect();
        assert_eq!(names, vec!["Green"]);

        // Still exactly one style row
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM styles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn style_lookup_is_case_insensitive() {
        let db = setup();
        let repo = SqliteInventoryRepository::new(db.connection());

        repo.upsert_styles(&[style("AB123", &["Black"])]).unwrap();
        repo.upsert_styles(&[style("ab123", &["White"])]).unwrap();

        let stored = repo.style_by_number("Ab123").unwrap().unwrap();
        let colors = repo.colors_for_style(stored.id).unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].color_name, "White");
    }

    #[test]
    fn upsert_placements_overwrites_by_composite_key() {
        let db = setup();
        let repo = SqliteInventoryRepository::new(db.connection());

        repo.upsert_placements(&[placement("54321", "Black", "A1")])
            .unwrap();
        repo.upsert_placements(&[placement("54321", "Black", "C7")])
            .unwrap();

        let stored = repo.placement_by_key("54321", "Black").unwrap().unwrap();
        assert_eq!(stored.shelf_location.as_deref(), Some("C7"));
        assert_eq!(stored.status, ItemStatus::Keep);
        assert!(stored.manager_approved);

        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM placements", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn list_inventory_joins_style_attributes() {
        let db = setup();
        let repo = SqliteInventoryRepository::new(db.connection());

        repo.upsert_styles(&[style("54321", &["Black"])]).unwrap();
        repo.upsert_placements(&[placement("54321", "Black", "A1")])
            .unwrap();

        let items = repo.list_inventory(10).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].style_number, "54321");
        assert_eq!(items[0].division.as_deref(), Some("Performance"));
        assert_eq!(items[0].shelf_location.as_deref(), Some("A1"));
    }

    #[test]
    fn watermark_ignores_failed_markers() {
        let db = setup();
        let repo = SqliteInventoryRepository::new(db.connection());

        assert!(repo.latest_watermark().unwrap().is_none());

        let t0 = Utc::now() - Duration::hours(1);
        repo.record_sync(t0, "dev-1", SyncLogStatus::Success).unwrap();
        repo.record_sync(Utc::now(), "dev-1", SyncLogStatus::Failed)
            .unwrap();

        let watermark = repo.latest_watermark().unwrap().unwrap();
        assert_eq!(watermark.timestamp(), t0.timestamp());
    }

    #[test]
    fn stats_counts_kept_and_pending() {
        let db = setup();
        let repo = SqliteInventoryRepository::new(db.connection());

        repo.upsert_styles(&[style("one", &["Red"]), style("two", &["Blue"])])
            .unwrap();
        repo.upsert_placements(&[placement("one", "Red", "A1")]).unwrap();

        let stats = repo.stats().unwrap();
        assert_eq!(stats.total_styles, 2);
        assert_eq!(stats.showroom_count, 1);
        assert_eq!(stats.pending_approvals, 0);
    }
}
