//! Local store layer for Shelftrack

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{InventoryRepository, SqliteInventoryRepository, SyncLogStatus};
