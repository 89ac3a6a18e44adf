//! Database connection management

use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

use super::migrations;

/// Wrapper around the local `SQLite` store.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist.
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        let database = Self { conn };
        database.configure()?;
        database.migrate()?;
        Ok(database)
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        let database = Self { conn };
        database.configure()?;
        database.migrate()?;
        Ok(database)
    }

    /// Configure `SQLite` for durability and concurrency.
    fn configure(&self) -> Result<()> {
        // WAL is unsupported for in-memory databases
        self.conn
            .pragma_update(None, "journal_mode", "WAL")
            .ok();
        self.conn.pragma_update(None, "synchronous", "NORMAL").ok();
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    /// Run database migrations.
    fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn)
    }

    /// Get a reference to the underlying connection.
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
