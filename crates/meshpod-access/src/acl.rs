//! ACL resolution and mutation for a single resource
//!
//! Resolution never invents permissions: a resource either has its own
//! list, or a new one is materialized as a copy of the nearest reachable
//! inherited list, or the operation fails with `AclUnavailable`. Each
//! resource call is independent; callers applying a change to multiple
//! resources must expect per-resource success or failure without rollback.

use meshpod_core::{
    AccessModes, AclRef, MeshpodError, MeshpodResult, PartyId, ResolvedAcl, Uri,
};

/// Resolves and mutates per-resource permission lists.
#[derive(Clone)]
pub struct AclReconciler {
    effects: AclRef,
}

impl AclReconciler {
    /// Create a reconciler over the given ACL handler.
    pub fn new(effects: AclRef) -> Self {
        Self { effects }
    }

    /// The effective permission list for a resource.
    ///
    /// A materialized document is seeded in memory from the inheritance
    /// chain and persisted on the next save.
    pub async fn resolve(&self, resource: &Uri) -> MeshpodResult<ResolvedAcl> {
        if let Some(document) = self.effects.read_own_acl(resource).await? {
            return Ok(ResolvedAcl {
                resource: resource.clone(),
                document,
                materialized: false,
            });
        }
        if let Some(document) = self.effects.read_fallback_acl(resource).await? {
            return Ok(ResolvedAcl {
                resource: resource.clone(),
                document,
                materialized: true,
            });
        }
        Err(MeshpodError::acl_unavailable(format!(
            "no own or inherited permission list reachable for {}",
            resource
        )))
    }

    /// Replace (not merge) one agent's four-flag permission set on one
    /// resource. Empty modes are a full revoke for that agent.
    pub async fn set_agent_access(
        &self,
        resource: &Uri,
        agent: &PartyId,
        modes: AccessModes,
    ) -> MeshpodResult<()> {
        let mut resolved = self.resolve(resource).await?;
        resolved.document.set_agent(agent.clone(), modes);
        Ok(self.effects.write_acl(resource, &resolved.document).await?)
    }

    /// Replace the public grant on one resource.
    pub async fn set_public_access(&self, resource: &Uri, modes: AccessModes) -> MeshpodResult<()> {
        let mut resolved = self.resolve(resource).await?;
        resolved.document.set_public(modes);
        Ok(self.effects.write_acl(resource, &resolved.document).await?)
    }
}
