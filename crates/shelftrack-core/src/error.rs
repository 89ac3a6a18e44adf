//! Error types for shelftrack-core

use thiserror::Error;

/// Result type alias using shelftrack-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shelftrack-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP transport error
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote API returned a non-success status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
