use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] shelftrack_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(
        "No backend endpoint configured. Run `shelftrack config set-endpoint <url>` first."
    )]
    NoEndpoint,
    #[error("Endpoint {0} failed the connectivity check; configuration unchanged")]
    EndpointUnreachable(String),
    #[error("Style number cannot be empty")]
    EmptyStyleNumber,
    #[error("Color cannot be empty")]
    EmptyColor,
    #[error("Shelf location cannot be empty")]
    EmptyShelfLocation,
}
