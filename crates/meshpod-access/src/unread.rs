//! Unseen-notification counting against client-local watermarks
//!
//! A watermark is the creation timestamp of the last acknowledged
//! notification of each kind; anything newer counts as unread. Counting is
//! a pure read: per-item parse failures are skipped and never abort the
//! count, so it is safe to run on a fixed interval.

use crate::inbox::InboxResolver;
use crate::store::NotificationStore;
use chrono::{DateTime, Utc};
use meshpod_core::{MeshpodResult, Notification, PartyId, PodStorageRef, Uri};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Unseen-notification counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCounts {
    /// Access requests created after the request watermark
    pub requests: usize,
    /// Access decisions created after the decision watermark
    pub decisions: usize,
}

impl UnreadCounts {
    /// Total unseen notifications.
    pub fn total(&self) -> usize {
        self.requests + self.decisions
    }
}

/// Client-local acknowledgement watermarks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermarks {
    /// Creation time of the last acknowledged access request
    pub last_seen_requests: Option<DateTime<Utc>>,
    /// Creation time of the last acknowledged access decision
    pub last_seen_decisions: Option<DateTime<Utc>>,
}

/// Read-only aggregator of unseen-notification counts.
pub struct UnreadActivityTracker {
    store: NotificationStore,
    resolver: InboxResolver,
    watermarks: Mutex<Watermarks>,
}

impl UnreadActivityTracker {
    /// Create a tracker with empty watermarks (everything counts as
    /// unread).
    pub fn new(storage: PodStorageRef) -> Self {
        Self::with_watermarks(storage, Watermarks::default())
    }

    /// Create a tracker restoring previously persisted watermarks.
    pub fn with_watermarks(storage: PodStorageRef, watermarks: Watermarks) -> Self {
        Self {
            store: NotificationStore::new(storage.clone()),
            resolver: InboxResolver::new(storage),
            watermarks: Mutex::new(watermarks),
        }
    }

    /// Current watermarks, for persisting client-side.
    pub async fn watermarks(&self) -> Watermarks {
        *self.watermarks.lock().await
    }

    /// Acknowledge every access request created up to `seen_at`.
    pub async fn mark_requests_seen(&self, seen_at: DateTime<Utc>) {
        self.watermarks.lock().await.last_seen_requests = Some(seen_at);
    }

    /// Acknowledge every access decision created up to `seen_at`.
    pub async fn mark_decisions_seen(&self, seen_at: DateTime<Utc>) {
        self.watermarks.lock().await.last_seen_decisions = Some(seen_at);
    }

    /// Count notifications in `container` created after the respective
    /// watermark.
    pub async fn compute_unread(&self, container: &Uri) -> MeshpodResult<UnreadCounts> {
        let notifications = self.store.read_all(container).await?;
        let marks = *self.watermarks.lock().await;

        let mut counts = UnreadCounts::default();
        for notification in &notifications {
            match notification {
                Notification::Request(request) => {
                    if is_after(request.created_at, marks.last_seen_requests) {
                        counts.requests += 1;
                    }
                }
                Notification::Decision(decision) => {
                    if is_after(decision.created_at, marks.last_seen_decisions) {
                        counts.decisions += 1;
                    }
                }
            }
        }
        Ok(counts)
    }

    /// Resolve a party's inbox and count unseen notifications in it. A
    /// party without an inbox has nothing unread.
    pub async fn compute_unread_for(&self, party: &PartyId) -> MeshpodResult<UnreadCounts> {
        match self.resolver.resolve_inbox(party).await {
            Some(container) => self.compute_unread(&container).await,
            None => Ok(UnreadCounts::default()),
        }
    }
}

fn is_after(created_at: DateTime<Utc>, watermark: Option<DateTime<Utc>>) -> bool {
    watermark.map(|mark| created_at > mark).unwrap_or(true)
}

/// Configuration for the unread poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Polling interval in milliseconds
    pub interval_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 15_000,
        }
    }
}

/// Fixed-interval polling task publishing unread counts.
///
/// There is no push path: coordination is polling only. The task stops
/// when every receiver of the published channel is dropped.
pub struct UnreadPoller {
    tracker: Arc<UnreadActivityTracker>,
    container: Uri,
    config: PollerConfig,
}

impl UnreadPoller {
    /// Create a poller over one inbox container.
    pub fn new(tracker: Arc<UnreadActivityTracker>, container: Uri, config: PollerConfig) -> Self {
        Self {
            tracker,
            container,
            config,
        }
    }

    /// Spawn the polling task. The first poll runs immediately, then one
    /// per interval; poll failures are logged and the task keeps going.
    pub fn spawn(self) -> (watch::Receiver<UnreadCounts>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(UnreadCounts::default());
        let handle = tokio::spawn(async move {
            let period = Duration::from_millis(self.config.interval_ms.max(1));
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match self.tracker.compute_unread(&self.container).await {
                    Ok(counts) => {
                        if tx.send(counts).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(container = %self.container, error = %err, "unread poll failed");
                        if tx.is_closed() {
                            break;
                        }
                    }
                }
            }
        });
        (rx, handle)
    }
}
