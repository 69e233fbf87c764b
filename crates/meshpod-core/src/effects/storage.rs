//! Pod storage effect interface
//!
//! The generic container/resource CRUD boundary. The core composes these
//! primitives; it never implements transport itself. Every operation is a
//! suspension point over the network.

use crate::errors::MeshpodError;
use crate::graph::Graph;
use crate::identifiers::Uri;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for pod storage operations.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// Container or resource absent
    #[error("Not found: {uri}")]
    NotFound {
        /// URI that did not resolve
        uri: String,
    },
    /// Fetch failed
    #[error("Read failed for {uri}: {message}")]
    ReadFailed {
        /// URI being read
        uri: String,
        /// Underlying failure
        message: String,
    },
    /// Persist failed
    #[error("Write failed for {uri}: {message}")]
    WriteFailed {
        /// URI being written
        uri: String,
        /// Underlying failure
        message: String,
    },
    /// Removal failed
    #[error("Delete failed for {uri}: {message}")]
    DeleteFailed {
        /// URI being deleted
        uri: String,
        /// Underlying failure
        message: String,
    },
    /// Malformed request or URI outside the handler's authority
    #[error("Invalid storage operation: {message}")]
    Invalid {
        /// Description of the problem
        message: String,
    },
}

impl StorageError {
    /// Whether this is the not-found category, which listings treat as an
    /// empty result and ensure-operations treat as a creation trigger.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

impl From<StorageError> for MeshpodError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { uri } => MeshpodError::not_found(uri),
            other => MeshpodError::storage(other.to_string()),
        }
    }
}

/// Generic container/resource CRUD over a party's pod.
#[async_trait]
pub trait PodStorageEffects: Send + Sync {
    /// Fetch and parse the graph stored at `uri`.
    async fn read_graph(&self, uri: &Uri) -> Result<Graph, StorageError>;

    /// Overwrite the graph stored at `uri`.
    async fn write_graph(&self, uri: &Uri, graph: &Graph) -> Result<(), StorageError>;

    /// POST-create a new contained resource. The server assigns the final
    /// identifier; `slug_hint` is advisory only and collisions are resolved
    /// server-side.
    async fn create_contained(
        &self,
        container: &Uri,
        graph: &Graph,
        slug_hint: &str,
    ) -> Result<Uri, StorageError>;

    /// Delete the resource at `uri`.
    async fn delete_resource(&self, uri: &Uri) -> Result<(), StorageError>;

    /// Enumerate the members of a container.
    async fn list_container(&self, container: &Uri) -> Result<Vec<Uri>, StorageError>;

    /// Create the container if absent. Returns `true` when it was created.
    async fn ensure_container(&self, container: &Uri) -> Result<bool, StorageError>;
}
