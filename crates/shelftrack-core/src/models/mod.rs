//! Domain models for Shelftrack

mod inventory;
mod placement;
mod style;

pub use inventory::{InventoryItem, SystemStats};
pub use placement::{ItemStatus, Placement};
pub use style::{Color, Style};
