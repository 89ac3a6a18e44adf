//! Sync engine: reconciles the local store against the remote backend.
//!
//! One logical sync runs at a time. Each incremental cycle uploads the
//! pending write queue first, then downloads deltas newer than the
//! watermark, and only advances the watermark when the download phase
//! completed without error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::api::{ClassificationRequest, PlacementRequest, RemoteGateway};
use crate::db::SyncLogStatus;
use crate::error::{Error, Result};
use crate::queue::{DrainSummary, PendingChange, PendingChangeType, PendingQueue};
use crate::services::DatabaseService;

/// A watermark older than this forces a sync on the next check.
const STALENESS_THRESHOLD_HOURS: i64 = 24;

/// What a sync trigger accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The cycle ran to completion.
    Completed(SyncReport),
    /// Another cycle was already in flight; this trigger was dropped.
    AlreadySyncing,
}

/// Counts from a completed sync cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub styles: usize,
    pub placements: usize,
    pub uploaded: usize,
    pub upload_failures: usize,
}

/// How an interactive submission was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// The backend acknowledged the write immediately.
    Submitted,
    /// The backend was unreachable; the write is queued for replay.
    Queued,
}

/// Orchestrates full and incremental synchronization.
///
/// Generic over the gateway so tests can substitute a double; all
/// shared state is observable from other tasks (`is_syncing`,
/// `last_sync`, `pending_changes`).
#[derive(Debug, Clone)]
pub struct SyncEngine<G> {
    gateway: G,
    store: DatabaseService,
    queue: PendingQueue,
    device_id: String,
    syncing: Arc<AtomicBool>,
    last_sync: Arc<Mutex<Option<DateTime<Utc>>>>,
    auto_sync: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<G: RemoteGateway> SyncEngine<G> {
    /// Create an engine, loading the persisted watermark.
    pub async fn new(
        gateway: G,
        store: DatabaseService,
        queue: PendingQueue,
        device_id: impl Into<String>,
    ) -> Result<Self> {
        let last_sync = store.latest_watermark().await?;
        Ok(Self {
            gateway,
            store,
            queue,
            device_id: device_id.into(),
            syncing: Arc::new(AtomicBool::new(false)),
            last_sync: Arc::new(Mutex::new(last_sync)),
            auto_sync: Arc::new(Mutex::new(None)),
        })
    }

    /// Whether a sync cycle is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    /// Timestamp of the last fully-successful sync.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        *self
            .last_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of queued local writes awaiting acknowledgment.
    pub fn pending_changes(&self) -> usize {
        self.queue.len()
    }

    /// Whether the local state is missing or stale.
    ///
    /// True when no successful sync has happened yet, or the watermark
    /// is older than the staleness threshold. No side effects.
    pub fn needs_sync(&self) -> bool {
        self.last_sync().map_or(true, |last| {
            Utc::now().signed_duration_since(last)
                > chrono::Duration::hours(STALENESS_THRESHOLD_HOURS)
        })
    }

    /// Replace local state with a complete remote snapshot.
    pub async fn full_sync(&self) -> Result<SyncOutcome> {
        if !self.begin() {
            return Ok(SyncOutcome::AlreadySyncing);
        }
        tracing::info!("Starting full sync for device {}", self.device_id);

        let result = self.run_full_sync().await;
        self.finish(result).await.map(SyncOutcome::Completed)
    }

    /// Upload queued writes, then apply deltas newer than the watermark.
    ///
    /// Falls back to a full sync when no watermark exists. Upload
    /// failures are absorbed (failed items stay queued); a failure in
    /// the download phase aborts the cycle without advancing the
    /// watermark.
    pub async fn incremental_sync(&self) -> Result<SyncOutcome> {
        let Some(since) = self.last_sync() else {
            tracing::info!("No sync watermark, falling back to full sync");
            return self.full_sync().await;
        };

        if !self.begin() {
            return Ok(SyncOutcome::AlreadySyncing);
        }
        tracing::info!("Starting incremental sync since {since}");

        let result = self.run_incremental_sync(since).await;
        self.finish(result).await.map(SyncOutcome::Completed)
    }

    /// Submit a classification now, queueing it when the backend is
    /// unreachable. The caller always succeeds locally.
    pub async fn classify(&self, request: ClassificationRequest) -> Result<SubmitDisposition> {
        match self.gateway.create_classification(&request).await {
            Ok(ack) => {
                tracing::debug!("Classification acknowledged: id {}", ack.classification_id);
                Ok(SubmitDisposition::Submitted)
            }
            Err(Error::Http(error)) => {
                tracing::info!(
                    "Queuing classification for {} - {}: {error}",
                    request.style_number,
                    request.color
                );
                self.queue.enqueue(
                    PendingChangeType::Classification,
                    serde_json::to_value(&request)?,
                );
                Ok(SubmitDisposition::Queued)
            }
            Err(other) => Err(other),
        }
    }

    /// Submit a placement now, queueing it when the backend is
    /// unreachable.
    pub async fn place(&self, request: PlacementRequest) -> Result<SubmitDisposition> {
        match self.gateway.create_placement(&request).await {
            Ok(_) => Ok(SubmitDisposition::Submitted),
            Err(Error::Http(error)) => {
                tracing::info!(
                    "Queuing placement for shelf {}: {error}",
                    request.shelf_location
                );
                self.queue.enqueue(
                    PendingChangeType::Placement,
                    serde_json::to_value(&request)?,
                );
                Ok(SubmitDisposition::Queued)
            }
            Err(other) => Err(other),
        }
    }

    /// Cancel the recurring sync task, if any. Idempotent.
    pub fn stop_auto_sync(&self) {
        let mut slot = self
            .auto_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
            tracing::debug!("Stopped auto sync");
        }
    }

    fn begin(&self) -> bool {
        let started = self
            .syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if !started {
            tracing::debug!("Sync already in flight, dropping trigger");
        }
        started
    }

    /// Record the outcome marker, advance the watermark on success,
    /// and release the single-flight guard on every path.
    async fn finish(&self, result: Result<SyncReport>) -> Result<SyncReport> {
        let status = match &result {
            Ok(_) => SyncLogStatus::Success,
            Err(_) => SyncLogStatus::Failed,
        };
        let now = Utc::now();

        if let Err(log_error) = self.store.record_sync(now, &self.device_id, status).await {
            tracing::warn!("Failed to record sync marker: {log_error}");
        }

        match &result {
            Ok(report) => {
                *self
                    .last_sync
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(now);
                tracing::info!(
                    "Sync completed: {} styles, {} placements, {} uploads ({} retained)",
                    report.styles,
                    report.placements,
                    report.uploaded,
                    report.upload_failures
                );
            }
            Err(error) => tracing::warn!("Sync failed: {error}"),
        }

        self.syncing.store(false, Ordering::SeqCst);
        result
    }

    async fn run_full_sync(&self) -> Result<SyncReport> {
        let snapshot = self.gateway.fetch_snapshot(&self.device_id).await?;
        self.store.upsert_styles(&snapshot.styles).await?;
        self.store.upsert_placements(&snapshot.placements).await?;

        Ok(SyncReport {
            styles: snapshot.styles.len(),
            placements: snapshot.placements.len(),
            ..SyncReport::default()
        })
    }

    async fn run_incremental_sync(&self, since: DateTime<Utc>) -> Result<SyncReport> {
        // Upload first so this device's own writes are settled before
        // the server's view of them can come back in the delta.
        let uploads = self.drain_pending().await;

        let delta = self.gateway.fetch_delta(since, &self.device_id).await?;
        if !delta.styles.is_empty() {
            self.store.upsert_styles(&delta.styles).await?;
        }
        if !delta.placements.is_empty() {
            self.store.upsert_placements(&delta.placements).await?;
        }

        Ok(SyncReport {
            styles: delta.styles.len(),
            placements: delta.placements.len(),
            uploaded: uploads.succeeded,
            upload_failures: uploads.failed,
        })
    }

    async fn drain_pending(&self) -> DrainSummary {
        self.queue.drain(|change| self.submit_change(change)).await
    }

    /// Replay one queued change against its submission endpoint.
    ///
    /// Unhandled change types and malformed payloads are logged and
    /// skipped (returning `Ok` removes them from the queue) so one bad
    /// record cannot wedge the queue forever.
    async fn submit_change(&self, change: PendingChange) -> Result<()> {
        match change.change_type {
            PendingChangeType::Classification => {
                let request: ClassificationRequest = match serde_json::from_value(change.data) {
                    Ok(request) => request,
                    Err(error) => {
                        tracing::warn!(
                            "Dropping malformed classification payload {}: {error}",
                            change.id
                        );
                        return Ok(());
                    }
                };
                self.gateway.create_classification(&request).await?;
                Ok(())
            }
            PendingChangeType::Placement => {
                let request: PlacementRequest = match serde_json::from_value(change.data) {
                    Ok(request) => request,
                    Err(error) => {
                        tracing::warn!(
                            "Dropping malformed placement payload {}: {error}",
                            change.id
                        );
                        return Ok(());
                    }
                };
                self.gateway.create_placement(&request).await?;
                Ok(())
            }
            PendingChangeType::CatalogItem => {
                tracing::warn!(
                    "Catalog item submission not handled, skipping change {}",
                    change.id
                );
                Ok(())
            }
        }
    }
}

impl<G> SyncEngine<G>
where
    G: RemoteGateway + Clone + Send + Sync + 'static,
{
    /// Schedule a recurring incremental sync.
    ///
    /// At most one timer is active; restarting replaces any existing
    /// one. The first cycle fires one interval from now.
    pub fn start_auto_sync(&self, interval: Duration) {
        let mut slot = self
            .auto_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let engine = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await; // the first tick completes immediately
            loop {
                ticker.tick().await;
                if let Err(error) = engine.incremental_sync().await {
                    tracing::warn!("Scheduled sync failed: {error}");
                }
            }
        });

        *slot = Some(handle);
        tracing::debug!("Auto sync scheduled every {interval:?}");
    }
}
