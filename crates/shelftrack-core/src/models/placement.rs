//! Placement model and item status

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Classification decision for an item, as used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Keep,
    Wait,
    Drop,
}

impl ItemStatus {
    /// Wire/storage string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Wait => "wait",
            Self::Drop => "drop",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(Self::Keep),
            "wait" => Ok(Self::Wait),
            "drop" => Ok(Self::Drop),
            other => Err(Error::InvalidInput(format!(
                "status must be keep, wait, or drop (got '{other}')"
            ))),
        }
    }
}

/// A physical shelf/showroom assignment for a (style, color) pair.
///
/// Upserted by the composite business key (`style_number`, `color`);
/// receiving a placement for an existing pair overwrites location and
/// state fields (last-write-wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Local row id
    pub id: i64,
    pub style_number: String,
    pub color: String,
    pub shelf_location: Option<String>,
    pub status: ItemStatus,
    pub manager_approved: bool,
    /// Placement timestamp (Unix ms)
    pub placed_at: Option<i64>,
}
