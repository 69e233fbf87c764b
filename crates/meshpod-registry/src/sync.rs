//! Registry membership reconciliation
//!
//! Brings a party's self-registration across discovery containers in line
//! with its declared participation configuration. After a successful run a
//! membership record for the party exists in a container if and only if
//! that container is in the next configuration's implied set.
//!
//! Deduplication is enforced only by a skip-if-exists scan; there are no
//! conditional writes, so syncs for the same party must be serialized by
//! the caller. Concurrent syncs of one party can race.

use futures::future::join_all;
use meshpod_core::{
    AccessModes, AclDocument, AclRef, ClockRef, MeshpodError, MeshpodResult, PartyId,
    PodStorageRef, RegistryConfig, RegistryMembership, RegistryMode, Uri,
};

/// Result of one membership synchronization run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Containers a stale membership record was removed from
    pub removed: Vec<Uri>,
    /// Containers a membership record was inserted into
    pub inserted: Vec<Uri>,
    /// Per-container failures; processing of the remaining containers
    /// continues regardless
    pub failures: Vec<(Uri, MeshpodError)>,
}

impl SyncReport {
    /// Whether the run completed without any per-container failure.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reconciles a party's registry self-registration.
pub struct RegistryMembershipSynchronizer {
    storage: PodStorageRef,
    acl: AclRef,
    clock: ClockRef,
}

impl RegistryMembershipSynchronizer {
    /// Create a synchronizer over the given handlers.
    pub fn new(storage: PodStorageRef, acl: AclRef, clock: ClockRef) -> Self {
        Self {
            storage,
            acl,
            clock,
        }
    }

    /// Reconcile membership records with a configuration change.
    ///
    /// Containers implied by `previous` but not by `next` are cleaned;
    /// containers implied by `next` get exactly one record for the party,
    /// skipping insertion where one already exists. In private mode the
    /// self-owned registry container is created on demand and given a
    /// public-read-only grant. Failures are isolated per container.
    pub async fn sync_membership(
        &self,
        party: &PartyId,
        previous: Option<&RegistryConfig>,
        next: &RegistryConfig,
    ) -> SyncReport {
        let next_set = next.implied_registries();
        let previous_set = previous
            .map(RegistryConfig::implied_registries)
            .unwrap_or_default();
        let mut report = SyncReport::default();

        for container in previous_set.difference(&next_set) {
            match self.remove_membership(party, container).await {
                Ok(true) => report.removed.push(container.clone()),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(container = %container, error = %err, "membership removal failed");
                    report.failures.push((container.clone(), err));
                }
            }
        }

        for container in &next_set {
            let ensure_private =
                next.mode == RegistryMode::Private && *container == next.private_registry;
            match self.ensure_membership(party, container, ensure_private).await {
                Ok(true) => report.inserted.push(container.clone()),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(container = %container, error = %err, "membership insertion failed");
                    report.failures.push((container.clone(), err));
                }
            }
        }

        report
    }

    /// Delete the party's record from a departed container. An absent or
    /// unreachable container is already clean, not an error.
    async fn remove_membership(&self, party: &PartyId, container: &Uri) -> MeshpodResult<bool> {
        let record = match self.find_membership(party, container).await {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(container = %container, error = %err, "departed container unreachable; treating as clean");
                return Ok(false);
            }
        };
        match record {
            Some(uri) => {
                self.storage.delete_resource(&uri).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Insert the party's record into a joined container unless one
    /// already exists.
    async fn ensure_membership(
        &self,
        party: &PartyId,
        container: &Uri,
        ensure_private: bool,
    ) -> MeshpodResult<bool> {
        if ensure_private {
            let created = self.storage.ensure_container(container).await?;
            if created {
                let mut acl = AclDocument::new();
                acl.set_agent(party.clone(), AccessModes::full());
                acl.set_public(AccessModes::read_only());
                self.acl.write_acl(container, &acl).await?;
            }
        }

        if self.find_membership(party, container).await?.is_some() {
            return Ok(false);
        }

        let graph = RegistryMembership::membership_graph(party, self.clock.now().await);
        self.storage
            .create_contained(container, &graph, "registration")
            .await?;
        Ok(true)
    }

    /// Scan a container for the party's membership record. Per-item read
    /// failures are skipped; a listing failure propagates, except
    /// not-found which reads as an empty container.
    async fn find_membership(
        &self,
        party: &PartyId,
        container: &Uri,
    ) -> MeshpodResult<Option<Uri>> {
        let members = match self.storage.list_container(container).await {
            Ok(members) => members,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let reads = members.iter().map(|uri| async move {
            match self.storage.read_graph(uri).await {
                Ok(graph) => RegistryMembership::from_graph(uri.clone(), &graph),
                Err(err) => {
                    tracing::debug!(uri = %uri, error = %err, "skipping unreadable registry record");
                    None
                }
            }
        });
        let found = join_all(reads)
            .await
            .into_iter()
            .flatten()
            .find(|record| record.member_id == *party);
        Ok(found.map(|record| record.uri))
    }
}
