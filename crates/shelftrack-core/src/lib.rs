//! shelftrack-core - Core library for Shelftrack
//!
//! This crate contains the shared models, local store, remote gateway
//! client, pending write queue, and sync engine used by all Shelftrack
//! interfaces.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod queue;
pub mod services;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{InventoryItem, ItemStatus, Placement, Style};
