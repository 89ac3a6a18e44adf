//! Read-path projections for display consumers

use serde::{Deserialize, Serialize};

use super::ItemStatus;

/// A placement joined with its style attributes, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub style_number: String,
    pub color: String,
    pub status: ItemStatus,
    pub division: Option<String>,
    pub gender: Option<String>,
    pub shelf_location: Option<String>,
}

/// Local aggregate counts for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_styles: usize,
    pub showroom_count: usize,
    pub pending_approvals: usize,
}
