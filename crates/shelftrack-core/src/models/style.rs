//! Style and color models

use serde::{Deserialize, Serialize};

/// A product style from the remote catalog.
///
/// The business key is `style_number`, unique under case-insensitive
/// comparison. A style owns its colors: re-synchronizing a style
/// replaces the full color set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    /// Local row id
    pub id: i64,
    /// Business key, e.g. "12345" (case-insensitive unique)
    pub style_number: String,
    pub division: Option<String>,
    pub gender: Option<String>,
    pub outsole: Option<String>,
    /// JSON-encoded list of originating file ids
    pub source_file_ids: Option<String>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Style {
    /// Check whether this style matches a business key, ignoring case.
    #[must_use]
    pub fn matches_number(&self, style_number: &str) -> bool {
        self.style_number.eq_ignore_ascii_case(style_number)
    }
}

/// A colorway belonging to exactly one [`Style`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Local row id
    pub id: i64,
    /// Owning style's local row id
    pub style_id: i64,
    pub color_name: String,
    /// Originating source file, when known
    pub source_file_id: Option<i64>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_number_is_case_insensitive() {
        let style = Style {
            id: 1,
            style_number: "AB123".to_string(),
            division: None,
            gender: None,
            outsole: None,
            source_file_ids: None,
            created_at: 0,
            updated_at: 0,
        };
        assert!(style.matches_number("ab123"));
        assert!(style.matches_number("AB123"));
        assert!(!style.matches_number("ab124"));
    }
}
