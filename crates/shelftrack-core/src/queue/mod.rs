//! Durable queue of not-yet-acknowledged local mutations.
//!
//! Changes are appended while offline (or after a failed immediate
//! submission) and replayed in FIFO order on the next sync cycle. The
//! queue persists its full contents to a JSON file on every mutation so
//! a restart never loses a queued write; a failed flush is logged and
//! swallowed, which bounds the loss to that single unflushed batch.

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Kind of queued mutation; decides which submission endpoint applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PendingChangeType {
    Classification,
    Placement,
    CatalogItem,
}

/// A queued, not-yet-acknowledged mutation.
///
/// The payload is opaque to the queue; the sync engine interprets
/// `data` according to `change_type` when replaying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChange {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub change_type: PendingChangeType,
    pub data: serde_json::Value,
    pub queued_at: DateTime<Utc>,
}

/// Result of a drain pass over the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct PendingQueue {
    inner: Arc<Mutex<Vec<PendingChange>>>,
    count: Arc<AtomicUsize>,
    path: PathBuf,
}

impl PendingQueue {
    /// Open the queue backed by the given file.
    ///
    /// A missing file is an empty queue; an unreadable one is logged
    /// and treated as empty rather than blocking startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let changes = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Vec<PendingChange>>(&bytes) {
                Ok(changes) => {
                    tracing::debug!("Loaded {} pending changes from disk", changes.len());
                    changes
                }
                Err(error) => {
                    tracing::warn!(
                        "Discarding unreadable pending queue at {}: {error}",
                        path.display()
                    );
                    Vec::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(error) => {
                tracing::warn!("Failed to read pending queue at {}: {error}", path.display());
                Vec::new()
            }
        };

        let count = Arc::new(AtomicUsize::new(changes.len()));
        Self {
            inner: Arc::new(Mutex::new(changes)),
            count,
            path,
        }
    }

    /// Append a change with a fresh identifier and current timestamp.
    ///
    /// Always succeeds from the caller's perspective; the durable write
    /// is best-effort.
    pub fn enqueue(&self, change_type: PendingChangeType, data: serde_json::Value) -> PendingChange {
        let change = PendingChange {
            id: Uuid::now_v7(),
            change_type,
            data,
            queued_at: Utc::now(),
        };

        let mut changes = self.lock();
        changes.push(change.clone());
        self.publish(&changes);
        change
    }

    /// Number of changes currently queued.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current queue contents, in insertion order.
    pub fn snapshot(&self) -> Vec<PendingChange> {
        self.lock().clone()
    }

    /// Replay the queued changes against `submit` in insertion order.
    ///
    /// Changes whose submission returns an error are retained, in the
    /// same relative order, for the next cycle; acknowledged changes
    /// are removed permanently. Changes enqueued while the pass runs
    /// are preserved untouched.
    pub async fn drain<F, Fut>(&self, mut submit: F) -> DrainSummary
    where
        F: FnMut(PendingChange) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            return DrainSummary::default();
        }

        tracing::info!("Replaying {} pending changes", snapshot.len());

        let mut failed = Vec::new();
        for change in &snapshot {
            if let Err(error) = submit(change.clone()).await {
                tracing::warn!(
                    "Pending change {} ({:?}) failed, will retry next cycle: {error}",
                    change.id,
                    change.change_type
                );
                failed.push(change.clone());
            }
        }

        let summary = DrainSummary {
            succeeded: snapshot.len() - failed.len(),
            failed: failed.len(),
        };

        let mut changes = self.lock();
        let drained_ids: Vec<Uuid> = snapshot.iter().map(|change| change.id).collect();
        let newer: Vec<PendingChange> = changes
            .iter()
            .filter(|change| !drained_ids.contains(&change.id))
            .cloned()
            .collect();
        failed.extend(newer);
        *changes = failed;
        self.publish(&changes);

        summary
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PendingChange>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist the queue and refresh the observable count.
    fn publish(&self, changes: &[PendingChange]) {
        self.count.store(changes.len(), Ordering::SeqCst);
        if let Err(error) = self.persist(changes) {
            // Accepted data-loss risk: the in-memory queue stays intact
            tracing::warn!(
                "Failed to persist pending queue at {}: {error}",
                self.path.display()
            );
        }
    }

    fn persist(&self, changes: &[PendingChange]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_vec(changes)?;
        std::fs::write(&self.path, encoded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn queue_in(dir: &tempfile::TempDir) -> PendingQueue {
        PendingQueue::open(dir.path().join("pending.json"))
    }

    #[test]
    fn missing_file_is_empty_queue() {
        let tmp = tempdir().unwrap();
        let queue = queue_in(&tmp);
        assert!(queue.is_empty());
    }

    #[test]
    fn enqueue_survives_reload() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("pending.json");

        let queue = PendingQueue::open(&path);
        queue.enqueue(
            PendingChangeType::Classification,
            json!({"style_number": "12345", "color": "Black", "status": "keep"}),
        );
        assert_eq!(queue.len(), 1);

        // Simulated process restart
        let reloaded = PendingQueue::open(&path);
        assert_eq!(reloaded.len(), 1);
        let changes = reloaded.snapshot();
        assert_eq!(changes[0].change_type, PendingChangeType::Classification);
        assert_eq!(changes[0].data["style_number"], "12345");
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("pending.json");
        std::fs::write(&path, b"not json").unwrap();

        let queue = PendingQueue::open(&path);
        assert!(queue.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn drain_retains_only_failures_in_order() {
        let tmp = tempdir().unwrap();
        let queue = queue_in(&tmp);

        queue.enqueue(PendingChangeType::Classification, json!({"n": 1}));
        let second = queue.enqueue(PendingChangeType::Classification, json!({"n": 2}));
        queue.enqueue(PendingChangeType::Classification, json!({"n": 3}));

        let failing_id = second.id;
        let summary = queue
            .drain(|change| async move {
                if change.id == failing_id {
                    Err(Error::InvalidInput("boom".to_string()))
                } else {
                    Ok(())
                }
            })
            .await;

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let remaining = queue.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, failing_id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn drain_replays_in_insertion_order() {
        let tmp = tempdir().unwrap();
        let queue = queue_in(&tmp);

        for n in 0..4 {
            queue.enqueue(PendingChangeType::Placement, json!({"n": n}));
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        queue
            .drain(move |change| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder.lock().unwrap().push(change.data["n"].as_i64().unwrap());
                    Ok(())
                }
            })
            .await;

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn drain_preserves_changes_enqueued_mid_pass() {
        let tmp = tempdir().unwrap();
        let queue = queue_in(&tmp);

        queue.enqueue(PendingChangeType::Classification, json!({"n": 1}));

        let late_arrival = queue.clone();
        queue
            .drain(move |_| {
                // A caller enqueues while the pass is in flight
                late_arrival.enqueue(PendingChangeType::Placement, json!({"n": 99}));
                async move { Ok(()) }
            })
            .await;

        let remaining = queue.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].data["n"], 99);
    }
}
