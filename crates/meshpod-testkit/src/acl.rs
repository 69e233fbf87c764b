//! In-memory ACL store for deterministic tests

use async_trait::async_trait;
use meshpod_core::{AclDocument, AclEffects, AclError, Uri};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    documents: BTreeMap<String, AclDocument>,
    fail_writes: bool,
}

/// Deterministic in-memory ACL store with failure injection.
#[derive(Debug, Clone, Default)]
pub struct MemoryAclStore {
    state: Arc<Mutex<State>>,
}

impl MemoryAclStore {
    /// Create an empty store. With no documents seeded, every resolution
    /// fails with `AclUnavailable`.
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::expect_used)]
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("acl state mutex poisoned")
    }

    /// Seed a resource's own permission list.
    pub fn insert_document(&self, resource: &Uri, document: AclDocument) {
        self.state()
            .documents
            .insert(resource.as_str().to_string(), document);
    }

    /// Direct look at a stored permission list.
    pub fn document(&self, resource: &Uri) -> Option<AclDocument> {
        self.state().documents.get(resource.as_str()).cloned()
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }
}

#[async_trait]
impl AclEffects for MemoryAclStore {
    async fn read_own_acl(&self, resource: &Uri) -> Result<Option<AclDocument>, AclError> {
        Ok(self.state().documents.get(resource.as_str()).cloned())
    }

    async fn read_fallback_acl(&self, resource: &Uri) -> Result<Option<AclDocument>, AclError> {
        let state = self.state();
        let mut ancestor = resource.parent_container();
        while let Some(container) = ancestor {
            if let Some(document) = state.documents.get(container.as_str()) {
                return Ok(Some(document.clone()));
            }
            ancestor = container.parent_container();
        }
        Ok(None)
    }

    async fn write_acl(&self, resource: &Uri, acl: &AclDocument) -> Result<(), AclError> {
        let mut state = self.state();
        if state.fail_writes {
            return Err(AclError::WriteFailed {
                resource: resource.to_string(),
                message: "write failure injected".to_string(),
            });
        }
        state
            .documents
            .insert(resource.as_str().to_string(), acl.clone());
        Ok(())
    }
}
