//! ACL storage effect interface
//!
//! Per-resource permission list read/resolve/save primitives. Resolution
//! policy (own list, else materialize from the inheritance chain) lives in
//! the reconciler, not here.

use crate::acl::AclDocument;
use crate::errors::MeshpodError;
use crate::identifiers::Uri;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for ACL storage operations.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum AclError {
    /// Permission list fetch failed
    #[error("ACL read failed for {resource}: {message}")]
    ReadFailed {
        /// Resource whose ACL was being read
        resource: String,
        /// Underlying failure
        message: String,
    },
    /// Permission list persist failed
    #[error("ACL write failed for {resource}: {message}")]
    WriteFailed {
        /// Resource whose ACL was being written
        resource: String,
        /// Underlying failure
        message: String,
    },
}

impl From<AclError> for MeshpodError {
    fn from(err: AclError) -> Self {
        MeshpodError::storage(err.to_string())
    }
}

/// Read and persist per-resource permission lists.
#[async_trait]
pub trait AclEffects: Send + Sync {
    /// The resource's own permission list, or `None` if it has none.
    async fn read_own_acl(&self, resource: &Uri) -> Result<Option<AclDocument>, AclError>;

    /// The nearest reachable inherited permission list, or `None` if the
    /// inheritance chain yields nothing accessible.
    async fn read_fallback_acl(&self, resource: &Uri) -> Result<Option<AclDocument>, AclError>;

    /// Persist the resource's own permission list.
    async fn write_acl(&self, resource: &Uri, acl: &AclDocument) -> Result<(), AclError>;
}
