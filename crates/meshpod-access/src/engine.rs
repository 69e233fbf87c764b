//! Access request lifecycle engine
//!
//! Owns deciding, notifying, and expiring access requests for a dataset
//! owner. Side effects are strictly ordered: permission changes first, the
//! local request update only after they succeed (a permission failure
//! leaves the request `pending`), and decision delivery last as a
//! best-effort step that is never retried and never rolls anything back.
//!
//! The engine owns a per-request lock map, so two decision operations on
//! the same request serialize within one process. There is no cross-process
//! coordination: storage writes are plain read-then-write, so exactly-once
//! semantics under concurrent writers is not guaranteed.

use crate::acl::AclReconciler;
use crate::inbox::InboxResolver;
use crate::store::NotificationStore;
use chrono::{DateTime, Utc};
use meshpod_core::model::format_timestamp;
use meshpod_core::{
    vocab, AccessDecision, AccessModes, AccessRequest, AclRef, ClockRef, Decision, FieldDeltas,
    MeshpodError, MeshpodResult, Notification, PartyId, PodStorageRef, RequestStatus, Uri,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Configuration for the decision engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Comment recorded on swept requests that carry none of their own
    pub expiry_comment: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expiry_comment: "Access expired.".to_string(),
        }
    }
}

/// Result of one expiration sweep.
#[derive(Debug, Default)]
pub struct SweepOutcome {
    /// Requests successfully revoked and marked expired
    pub expired: Vec<Uri>,
    /// Requests whose sweep failed; one failure never blocks others
    pub failures: Vec<(Uri, MeshpodError)>,
}

/// Per-request lock map. Entries are created on demand and kept for the
/// engine's lifetime; the request population of one inbox is small.
#[derive(Default)]
struct RequestLocks {
    inner: Mutex<HashMap<Uri, Arc<Mutex<()>>>>,
}

impl RequestLocks {
    async fn acquire(&self, uri: &Uri) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(uri.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

/// Owns the access request lifecycle for one dataset owner.
pub struct AccessDecisionEngine {
    owner: PartyId,
    clock: ClockRef,
    store: NotificationStore,
    resolver: InboxResolver,
    acl: AclReconciler,
    config: EngineConfig,
    locks: RequestLocks,
}

impl AccessDecisionEngine {
    /// Create an engine acting on behalf of `owner`.
    pub fn new(
        owner: PartyId,
        storage: PodStorageRef,
        acl_effects: AclRef,
        clock: ClockRef,
        config: EngineConfig,
    ) -> Self {
        Self {
            owner,
            clock,
            store: NotificationStore::new(storage.clone()),
            resolver: InboxResolver::new(storage),
            acl: AclReconciler::new(acl_effects),
            config,
            locks: RequestLocks::default(),
        }
    }

    /// The owner this engine decides for.
    pub fn owner(&self) -> &PartyId {
        &self.owner
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide an access request.
    ///
    /// An approval grants the full four-flag set on the dataset resources
    /// (delegation, not a read-only grant); a revocation clears it; a
    /// denial has no permission side effect. The local request record is
    /// updated only after all permission changes succeed. Delivery of the
    /// decision record into the requester's inbox is best-effort and
    /// at-most-once.
    ///
    /// The transition is validated against the stored record, not the
    /// caller's snapshot; a decision on a terminal request is rejected
    /// with [`MeshpodError::InvalidTransition`].
    pub async fn decide(
        &self,
        request: &AccessRequest,
        decision: Decision,
        comment: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> MeshpodResult<()> {
        let _guard = self.locks.acquire(&request.uri).await;

        // The caller's snapshot may predate a decision taken under this
        // lock; the stored record is authoritative for the transition check.
        let current = match self.store.read(&request.uri).await {
            Some(Notification::Request(stored)) => stored.status,
            _ => request.status,
        };
        let next = decision.resulting_status();
        if !current.can_transition(next) {
            return Err(MeshpodError::invalid_transition(
                current.as_str(),
                next.as_str(),
            ));
        }

        self.apply_permissions(request, decision).await?;

        let now = self.clock.now().await;
        let comment = comment.filter(|c| !c.trim().is_empty());
        let mut deltas = FieldDeltas::new();
        deltas.insert(vocab::STATUS.to_string(), Some(next.as_str().to_string()));
        deltas.insert(vocab::DECISION_COMMENT.to_string(), comment.clone());
        deltas.insert(
            vocab::EXPIRES_AT.to_string(),
            expires_at.map(format_timestamp),
        );
        deltas.insert(
            vocab::DECIDED_AT.to_string(),
            Some(format_timestamp(now)),
        );
        deltas.insert(
            vocab::DECIDED_BY.to_string(),
            Some(self.owner.as_str().to_string()),
        );
        self.store.update_fields(&request.uri, &deltas).await?;

        self.deliver_decision(request, decision, comment.as_deref(), expires_at, now)
            .await;
        Ok(())
    }

    /// Revoke permissions and mark expired every approved request whose
    /// expiration lies in the past. Requests are processed independently;
    /// one failure never blocks the others.
    pub async fn sweep_expirations(&self, requests: &[AccessRequest]) -> SweepOutcome {
        let now = self.clock.now().await;
        let mut outcome = SweepOutcome::default();
        for request in requests {
            if !request.is_expired(now) {
                continue;
            }
            let _guard = self.locks.acquire(&request.uri).await;
            match self.expire_one(request, now).await {
                Ok(()) => outcome.expired.push(request.uri.clone()),
                Err(err) => {
                    tracing::warn!(request = %request.uri, error = %err, "expiration sweep failed");
                    outcome.failures.push((request.uri.clone(), err));
                }
            }
        }
        outcome
    }

    /// Read an inbox container and sweep expirations found in it.
    ///
    /// The sweep runs only as a side effect of inbox reads; the staleness
    /// window equals the interval between reads. Swept requests are
    /// re-read so the returned list reflects their expired status.
    pub async fn read_inbox(&self, container: &Uri) -> MeshpodResult<Vec<Notification>> {
        let mut notifications = self.store.read_all(container).await?;
        let requests: Vec<AccessRequest> = notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Request(request) => Some(request.clone()),
                Notification::Decision(_) => None,
            })
            .collect();

        let outcome = self.sweep_expirations(&requests).await;
        if !outcome.expired.is_empty() {
            for notification in notifications.iter_mut() {
                if let Notification::Request(request) = notification {
                    if outcome.expired.contains(&request.uri) {
                        if let Some(Notification::Request(fresh)) =
                            self.store.read(&request.uri).await
                        {
                            *request = fresh;
                        }
                    }
                }
            }
        }
        Ok(notifications)
    }

    async fn apply_permissions(
        &self,
        request: &AccessRequest,
        decision: Decision,
    ) -> MeshpodResult<()> {
        let modes = match decision {
            Decision::Approved => AccessModes::full(),
            Decision::Revoked | Decision::Expired => AccessModes::none(),
            Decision::Denied => return Ok(()),
        };
        for resource in request.dataset_resources() {
            self.acl
                .set_agent_access(&resource, &request.requester_id, modes)
                .await?;
        }
        Ok(())
    }

    async fn expire_one(&self, request: &AccessRequest, now: DateTime<Utc>) -> MeshpodResult<()> {
        for resource in request.dataset_resources() {
            self.acl
                .set_agent_access(&resource, &request.requester_id, AccessModes::none())
                .await?;
        }

        let mut deltas = FieldDeltas::new();
        deltas.insert(
            vocab::STATUS.to_string(),
            Some(RequestStatus::Expired.as_str().to_string()),
        );
        deltas.insert(
            vocab::DECIDED_AT.to_string(),
            Some(format_timestamp(now)),
        );
        deltas.insert(
            vocab::DECIDED_BY.to_string(),
            Some(self.owner.as_str().to_string()),
        );
        if request.decision_comment.is_none() {
            deltas.insert(
                vocab::DECISION_COMMENT.to_string(),
                Some(self.config.expiry_comment.clone()),
            );
        }
        self.store.update_fields(&request.uri, &deltas).await
    }

    /// Best-effort, at-most-once delivery of the decision record into the
    /// requester's inbox. Failures are logged and never retried.
    async fn deliver_decision(
        &self,
        request: &AccessRequest,
        decision: Decision,
        comment: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) {
        let Some(inbox) = self.resolver.resolve_inbox(&request.requester_id).await else {
            tracing::warn!(
                requester = %request.requester_id,
                "requester has no inbox; decision not delivered"
            );
            return;
        };

        let graph = AccessDecision::build_graph(
            decision,
            &request.requester_id,
            &request.dataset_id,
            &request.dataset_title,
            &request.dataset_access_url,
            comment,
            expires_at,
            now,
        );
        let slug = format!("decision-{}", uuid::Uuid::new_v4());
        if let Err(err) = self.store.create(&inbox, &graph, &slug).await {
            tracing::warn!(
                requester = %request.requester_id,
                inbox = %inbox,
                error = %err,
                "decision delivery failed"
            );
        }
    }
}
