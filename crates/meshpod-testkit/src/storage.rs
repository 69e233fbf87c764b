//! In-memory pod storage for deterministic tests
//!
//! Implements `PodStorageEffects` over a shared map. Individual URIs can be
//! poisoned to simulate unreachable resources or containers.
//!
//! Uses `std::sync::Mutex`: this is test infrastructure with short critical
//! sections and no await points while locked.

use async_trait::async_trait;
use meshpod_core::{Graph, PodStorageEffects, StorageError, Uri};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    resources: BTreeMap<String, Graph>,
    containers: BTreeSet<String>,
    poisoned: BTreeSet<String>,
}

/// Deterministic in-memory pod storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryPodStorage {
    state: Arc<Mutex<State>>,
}

impl MemoryPodStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::expect_used)]
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("storage state mutex poisoned")
    }

    /// Register a container without going through the effect interface.
    pub fn insert_container(&self, container: &Uri) {
        self.state().containers.insert(container_key(container));
    }

    /// Seed a resource, registering its parent container as well.
    pub fn insert_graph(&self, uri: &Uri, graph: Graph) {
        let mut state = self.state();
        if let Some(parent) = uri.parent_container() {
            state.containers.insert(container_key(&parent));
        }
        state.resources.insert(uri.as_str().to_string(), graph);
    }

    /// Make every operation touching `uri` fail. Poisoning a container URI
    /// breaks listing and creation in it.
    pub fn poison(&self, uri: &Uri) {
        self.state().poisoned.insert(uri.as_str().to_string());
    }

    /// Direct look at a stored resource.
    pub fn graph(&self, uri: &Uri) -> Option<Graph> {
        self.state().resources.get(uri.as_str()).cloned()
    }

    /// Whether a resource is stored.
    pub fn contains(&self, uri: &Uri) -> bool {
        self.state().resources.contains_key(uri.as_str())
    }

    /// Whether a container is registered.
    pub fn container_exists(&self, container: &Uri) -> bool {
        self.state().containers.contains(&container_key(container))
    }

    fn check_poisoned(state: &State, uri: &Uri) -> bool {
        if state.poisoned.contains(uri.as_str()) {
            return true;
        }
        // A poisoned container takes its members down with it.
        uri.parent_container()
            .map(|parent| state.poisoned.contains(parent.as_str()))
            .unwrap_or(false)
    }
}

fn container_key(container: &Uri) -> String {
    let mut key = container.as_str().to_string();
    if !key.ends_with('/') {
        key.push('/');
    }
    key
}

#[async_trait]
impl PodStorageEffects for MemoryPodStorage {
    async fn read_graph(&self, uri: &Uri) -> Result<Graph, StorageError> {
        let state = self.state();
        if Self::check_poisoned(&state, uri) {
            return Err(StorageError::ReadFailed {
                uri: uri.to_string(),
                message: "poisoned".to_string(),
            });
        }
        state
            .resources
            .get(uri.as_str())
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                uri: uri.to_string(),
            })
    }

    async fn write_graph(&self, uri: &Uri, graph: &Graph) -> Result<(), StorageError> {
        let mut state = self.state();
        if Self::check_poisoned(&state, uri) {
            return Err(StorageError::WriteFailed {
                uri: uri.to_string(),
                message: "poisoned".to_string(),
            });
        }
        state
            .resources
            .insert(uri.as_str().to_string(), graph.clone());
        Ok(())
    }

    async fn create_contained(
        &self,
        container: &Uri,
        graph: &Graph,
        slug_hint: &str,
    ) -> Result<Uri, StorageError> {
        let mut state = self.state();
        if Self::check_poisoned(&state, container) {
            return Err(StorageError::WriteFailed {
                uri: container.to_string(),
                message: "poisoned".to_string(),
            });
        }
        if !state.containers.contains(&container_key(container)) {
            return Err(StorageError::NotFound {
                uri: container.to_string(),
            });
        }

        let slug = if slug_hint.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            slug_hint.to_string()
        };
        let mut candidate = container.join(&slug);
        let mut suffix = 1;
        while state.resources.contains_key(candidate.as_str()) {
            suffix += 1;
            candidate = container.join(&format!("{}-{}", slug, suffix));
        }
        state
            .resources
            .insert(candidate.as_str().to_string(), graph.clone());
        Ok(candidate)
    }

    async fn delete_resource(&self, uri: &Uri) -> Result<(), StorageError> {
        let mut state = self.state();
        if Self::check_poisoned(&state, uri) {
            return Err(StorageError::DeleteFailed {
                uri: uri.to_string(),
                message: "poisoned".to_string(),
            });
        }
        if state.resources.remove(uri.as_str()).is_none() {
            return Err(StorageError::NotFound {
                uri: uri.to_string(),
            });
        }
        Ok(())
    }

    async fn list_container(&self, container: &Uri) -> Result<Vec<Uri>, StorageError> {
        let state = self.state();
        let key = container_key(container);
        if state.poisoned.contains(&key) {
            return Err(StorageError::ReadFailed {
                uri: container.to_string(),
                message: "poisoned".to_string(),
            });
        }
        if !state.containers.contains(&key) {
            return Err(StorageError::NotFound {
                uri: container.to_string(),
            });
        }
        let members = state
            .resources
            .keys()
            .filter(|uri| {
                uri.strip_prefix(&key)
                    .map(|rest| !rest.is_empty() && !rest.contains('/'))
                    .unwrap_or(false)
            })
            .map(|uri| Uri::new(uri.clone()))
            .collect();
        Ok(members)
    }

    async fn ensure_container(&self, container: &Uri) -> Result<bool, StorageError> {
        let mut state = self.state();
        if Self::check_poisoned(&state, container) {
            return Err(StorageError::WriteFailed {
                uri: container.to_string(),
                message: "poisoned".to_string(),
            });
        }
        Ok(state.containers.insert(container_key(container)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_resolves_collisions() {
        let storage = MemoryPodStorage::new();
        let container = Uri::new("https://pod.example/inbox/");
        storage.insert_container(&container);

        let first = storage
            .create_contained(&container, &Graph::new(), "req")
            .await
            .expect("create");
        let second = storage
            .create_contained(&container, &Graph::new(), "req")
            .await
            .expect("create");
        assert_eq!(first.as_str(), "https://pod.example/inbox/req");
        assert_eq!(second.as_str(), "https://pod.example/inbox/req-2");
    }

    #[tokio::test]
    async fn poisoned_uris_fail() {
        let storage = MemoryPodStorage::new();
        let uri = Uri::new("https://pod.example/inbox/req");
        storage.insert_graph(&uri, Graph::new());
        storage.poison(&uri);
        assert!(storage.read_graph(&uri).await.is_err());
    }

    #[tokio::test]
    async fn listing_missing_container_is_not_found() {
        let storage = MemoryPodStorage::new();
        let err = storage
            .list_container(&Uri::new("https://pod.example/absent/"))
            .await
            .expect_err("missing");
        assert!(err.is_not_found());
    }
}
