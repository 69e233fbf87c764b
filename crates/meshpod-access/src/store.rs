//! Typed notification records inside a container
//!
//! Listing and per-item reads degrade gracefully: a malformed or
//! unreachable record is logged and excluded from the result set, never
//! surfaced as a whole-operation failure. Field updates follow the
//! read-modify-write contract with per-field remove-then-set semantics.

use futures::future::join_all;
use meshpod_core::{
    FieldDeltas, Graph, MeshpodResult, Notification, PodStorageRef, Uri,
};

/// Lists, parses, creates, and partially updates notification records.
#[derive(Clone)]
pub struct NotificationStore {
    storage: PodStorageRef,
}

impl NotificationStore {
    /// Create a store over the given storage handler.
    pub fn new(storage: PodStorageRef) -> Self {
        Self { storage }
    }

    /// Enumerate the members of a container. An absent container is an
    /// empty result, not an error.
    pub async fn list(&self, container: &Uri) -> MeshpodResult<Vec<Uri>> {
        match self.storage.list_container(container).await {
            Ok(members) => Ok(members),
            Err(err) if err.is_not_found() => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Fetch and classify one record. Network and parse failures are
    /// logged and yield `None`; resources matching neither notification
    /// kind also yield `None`.
    pub async fn read(&self, uri: &Uri) -> Option<Notification> {
        let graph = match self.storage.read_graph(uri).await {
            Ok(graph) => graph,
            Err(err) => {
                tracing::warn!(uri = %uri, error = %err, "skipping unreadable record");
                return None;
            }
        };
        let notification = Notification::from_graph(uri.clone(), &graph);
        if notification.is_none() {
            tracing::debug!(uri = %uri, "resource is not a notification record");
        }
        notification
    }

    /// List a container and read every member concurrently. Aggregation
    /// (filtering, newest-first ordering) happens after all per-item
    /// fetches have resolved; there is no ordering guarantee among them.
    pub async fn read_all(&self, container: &Uri) -> MeshpodResult<Vec<Notification>> {
        let members = self.list(container).await?;
        let reads = members.iter().map(|uri| self.read(uri));
        let mut notifications: Vec<Notification> =
            join_all(reads).await.into_iter().flatten().collect();
        notifications.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(notifications)
    }

    /// POST-create a record in a container. The slug is advisory; the
    /// server assigns the final identifier.
    pub async fn create(
        &self,
        container: &Uri,
        graph: &Graph,
        slug_hint: &str,
    ) -> MeshpodResult<Uri> {
        Ok(self
            .storage
            .create_contained(container, graph, slug_hint)
            .await?)
    }

    /// Read-modify-write a record's fields. For each field present in
    /// `deltas` the existing values are removed, then the new value is set
    /// only if non-empty; fields absent from `deltas` are untouched.
    pub async fn update_fields(&self, uri: &Uri, deltas: &FieldDeltas) -> MeshpodResult<()> {
        let mut graph = self.storage.read_graph(uri).await?;
        graph.apply_deltas(deltas);
        Ok(self.storage.write_graph(uri, &graph).await?)
    }
}
