//! Remote gateway client for the inventory backend.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::ItemStatus;
use crate::util::{compact_text, is_http_url, normalize_text_option};

/// Per-request timeout; a stalled request fails after this long.
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Whole-transfer timeout covering the full response body.
const RESOURCE_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Style record as the backend emits it in snapshot/delta responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStyle {
    #[serde(default)]
    pub id: i64,
    pub style_number: String,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub outsole: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub source_file_ids: Vec<i64>,
    #[serde(default)]
    pub updated_at: String,
}

/// Placement record as the backend emits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPlacement {
    #[serde(default)]
    pub id: i64,
    pub style_number: String,
    pub color: String,
    #[serde(default)]
    pub shelf_location: Option<String>,
}

/// Source file metadata included in full snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncFile {
    pub id: i64,
    pub filename: String,
    pub file_type: String,
    pub category: String,
    pub upload_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMetadata {
    pub current_timestamp: String,
    #[serde(default)]
    pub total_styles: Option<usize>,
    #[serde(default)]
    pub total_placements: Option<usize>,
    #[serde(default)]
    pub changes_count: Option<usize>,
}

/// Full-state response from `GET /api/sync`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotResponse {
    #[serde(default)]
    pub files: Vec<SyncFile>,
    #[serde(default)]
    pub styles: Vec<SyncStyle>,
    #[serde(default)]
    pub placements: Vec<SyncPlacement>,
    pub sync_metadata: SyncMetadata,
}

/// Changes-since response from `GET /api/sync/changes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaResponse {
    #[serde(default)]
    pub styles: Vec<SyncStyle>,
    #[serde(default)]
    pub placements: Vec<SyncPlacement>,
    pub sync_metadata: SyncMetadata,
}

/// Body for `POST /api/warehouse/classify`.
///
/// Also serves as the durable payload of a queued classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub style_number: String,
    pub color: String,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinator_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

/// Body for `POST /api/warehouse/placement`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub classification_id: i64,
    pub shelf_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinator_user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationAck {
    pub classification_id: i64,
    pub style_number: String,
    pub color: String,
    pub status: ItemStatus,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementAck {
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Remote authority interface, kept as a trait so sync logic can be
/// exercised against test doubles.
pub trait RemoteGateway {
    /// Fetch the complete remote state for this device.
    fn fetch_snapshot(
        &self,
        device_id: &str,
    ) -> impl Future<Output = Result<SnapshotResponse>> + Send;

    /// Fetch changes strictly newer than `since`.
    fn fetch_delta(
        &self,
        since: DateTime<Utc>,
        device_id: &str,
    ) -> impl Future<Output = Result<DeltaResponse>> + Send;

    /// Submit a warehouse classification.
    fn create_classification(
        &self,
        request: &ClassificationRequest,
    ) -> impl Future<Output = Result<ClassificationAck>> + Send;

    /// Submit a showroom placement for an approved classification.
    fn create_placement(
        &self,
        request: &PlacementRequest,
    ) -> impl Future<Output = Result<PlacementAck>> + Send;
}

/// HTTP client for the inventory backend.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    client: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let client = reqwest::Client::builder()
            .read_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .timeout(Duration::from_secs(RESOURCE_TIMEOUT_SECS))
            .build()?;
        Ok(Self { base_url, client })
    }

    /// The normalized base URL this client targets.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe a candidate endpoint's health route.
    ///
    /// Used by the configuration flow before activating a new endpoint;
    /// any transport or status failure reports `false`.
    pub async fn test_connectivity(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                tracing::debug!("Connectivity test failed for {url}: {error}");
                false
            }
        }
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                body: compact_text(&body),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

impl RemoteGateway for GatewayClient {
    async fn fetch_snapshot(&self, device_id: &str) -> Result<SnapshotResponse> {
        let response = self
            .client
            .get(format!("{}/api/sync", self.base_url))
            .query(&[("device_id", device_id)])
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn fetch_delta(&self, since: DateTime<Utc>, device_id: &str) -> Result<DeltaResponse> {
        let response = self
            .client
            .get(format!("{}/api/sync/changes", self.base_url))
            .query(&[("since", since.to_rfc3339()), ("device_id", device_id.to_string())])
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn create_classification(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationAck> {
        let response = self
            .client
            .post(format!("{}/api/warehouse/classify", self.base_url))
            .json(request)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn create_placement(&self, request: &PlacementRequest) -> Result<PlacementAck> {
        let response = self
            .client
            .post(format!("{}/api/warehouse/placement", self.base_url))
            .json(request)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let url = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::InvalidInput("endpoint must not be empty".to_string()))?;
    if is_http_url(&url) {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}
