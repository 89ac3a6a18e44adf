//! Database migrations

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version
const CURRENT_VERSION: i32 = 1;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Migration to version 1: Initial schema
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );
        -- Styles, unique business key under case-insensitive comparison
        CREATE TABLE IF NOT EXISTS styles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            style_number TEXT NOT NULL UNIQUE COLLATE NOCASE,
            division TEXT,
            gender TEXT,
            outsole TEXT,
            source_file_ids TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_styles_number ON styles(style_number);
        -- Colors, owned by their style
        CREATE TABLE IF NOT EXISTS colors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            style_id INTEGER NOT NULL REFERENCES styles(id) ON DELETE CASCADE,
            color_name TEXT NOT NULL,
            source_file_id INTEGER,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_colors_style_id ON colors(style_id);
        -- Showroom placements, upserted by (style_number, color)
        CREATE TABLE IF NOT EXISTS placements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            style_number TEXT NOT NULL,
            color TEXT NOT NULL,
            shelf_location TEXT,
            status TEXT NOT NULL,
            manager_approved INTEGER NOT NULL DEFAULT 0,
            placed_at INTEGER,
            UNIQUE(style_number, color)
        );
        CREATE INDEX IF NOT EXISTS idx_placements_style ON placements(style_number);
        -- Sync history; the watermark is the newest success row
        CREATE TABLE IF NOT EXISTS sync_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            last_sync_timestamp TEXT NOT NULL,
            device_id TEXT NOT NULL,
            sync_status TEXT NOT NULL
        );
        INSERT INTO schema_version (version) VALUES (1);
        COMMIT;",
    )?;

    tracing::info!("Migrated database to version {CURRENT_VERSION}");
    Ok(())
}
