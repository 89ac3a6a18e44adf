//! Client configuration persisted between runs.
//!
//! Holds the active backend endpoint and the stable device identifier
//! the sync protocol keys on. The endpoint is only meant to be changed
//! after a successful connectivity test (the configuration flow owns
//! that check).

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Active backend base URL; sync is unavailable until one is set.
    #[serde(default)]
    pub backend_url: Option<String>,
    /// Stable per-install identifier sent with every sync request.
    pub device_id: String,
}

impl ClientConfig {
    /// Load the config file, creating one with a fresh device id on
    /// first run.
    pub fn load_or_init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                let config = Self {
                    backend_url: None,
                    device_id: Uuid::now_v7().to_string(),
                };
                config.save(path)?;
                tracing::info!("Initialized client config with device id {}", config.device_id);
                Ok(config)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Persist the config.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Validate and set a new backend endpoint.
    pub fn set_backend_url(&mut self, url: impl Into<String>) -> Result<()> {
        let url = normalize_text_option(Some(url.into()))
            .ok_or_else(|| Error::InvalidInput("endpoint must not be empty".to_string()))?;
        if !is_http_url(&url) {
            return Err(Error::InvalidInput(
                "endpoint must include http:// or https://".to_string(),
            ));
        }
        self.backend_url = Some(url.trim_end_matches('/').to_string());
        Ok(())
    }
}
