//! Filesystem ACL handler - production only
//!
//! Permission lists are sidecar `.acl.json` documents next to the resource
//! they govern. Fallback lookup walks the container ancestry until a
//! sidecar is found or the handler's base is left.

use crate::layout::PodLayout;
use async_trait::async_trait;
use meshpod_core::{AclDocument, AclEffects, AclError, Uri};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem-backed ACL store for production use.
#[derive(Debug, Clone)]
pub struct FilesystemAclStore {
    layout: PodLayout,
}

impl FilesystemAclStore {
    /// Create a handler serving `base_uri` from `base_path`.
    ///
    /// Point it at the same base as the matching `FilesystemPodStorage` so
    /// sidecars land next to the documents they govern.
    pub fn new(base_uri: Uri, base_path: PathBuf) -> Self {
        Self {
            layout: PodLayout::new(&base_uri, base_path),
        }
    }

    async fn read_document(resource: &Uri, path: &Path) -> Result<Option<AclDocument>, AclError> {
        match fs::read(path).await {
            Ok(body) => serde_json::from_slice(&body)
                .map(Some)
                .map_err(|e| AclError::ReadFailed {
                    resource: resource.to_string(),
                    message: format!("malformed ACL document: {}", e),
                }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AclError::ReadFailed {
                resource: resource.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn acl_path(&self, resource: &Uri) -> Result<PathBuf, AclError> {
        self.layout
            .acl_file(resource)
            .map_err(|e| AclError::ReadFailed {
                resource: resource.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl AclEffects for FilesystemAclStore {
    async fn read_own_acl(&self, resource: &Uri) -> Result<Option<AclDocument>, AclError> {
        let path = self.acl_path(resource)?;
        Self::read_document(resource, &path).await
    }

    async fn read_fallback_acl(&self, resource: &Uri) -> Result<Option<AclDocument>, AclError> {
        let mut ancestor = resource.parent_container();
        while let Some(container) = ancestor {
            if !self.layout.contains(&container) {
                break;
            }
            let path = self.acl_path(&container)?;
            if let Some(doc) = Self::read_document(&container, &path).await? {
                return Ok(Some(doc));
            }
            ancestor = container.parent_container();
        }
        Ok(None)
    }

    async fn write_acl(&self, resource: &Uri, acl: &AclDocument) -> Result<(), AclError> {
        let path = self.acl_path(resource)?;
        let body = serde_json::to_vec_pretty(acl).map_err(|e| AclError::WriteFailed {
            resource: resource.to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AclError::WriteFailed {
                    resource: resource.to_string(),
                    message: e.to_string(),
                })?;
        }
        fs::write(&path, body).await.map_err(|e| AclError::WriteFailed {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpod_core::AccessModes;

    fn store(dir: &tempfile::TempDir) -> FilesystemAclStore {
        FilesystemAclStore::new(Uri::new("https://pod.example/"), dir.path().to_path_buf())
    }

    #[tokio::test]
    async fn own_acl_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let acls = store(&dir);
        let resource = Uri::new("https://pod.example/data/sensor.json");
        let agent = Uri::new("https://requester.example/profile#me");

        let mut doc = AclDocument::new();
        doc.set_agent(agent.clone(), AccessModes::full());
        acls.write_acl(&resource, &doc).await.expect("write");

        let back = acls.read_own_acl(&resource).await.expect("read").expect("present");
        assert_eq!(back.agent_modes(&agent), AccessModes::full());
    }

    #[tokio::test]
    async fn fallback_walks_container_ancestry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let acls = store(&dir);
        let root = Uri::new("https://pod.example/data/");
        let resource = Uri::new("https://pod.example/data/deep/sensor.json");

        let mut doc = AclDocument::new();
        doc.set_public(AccessModes::read_only());
        acls.write_acl(&root, &doc).await.expect("write");

        assert!(acls.read_own_acl(&resource).await.expect("read").is_none());
        let inherited = acls
            .read_fallback_acl(&resource)
            .await
            .expect("read")
            .expect("inherited");
        assert_eq!(inherited.public_modes(), AccessModes::read_only());
    }

    #[tokio::test]
    async fn no_acl_anywhere_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let acls = store(&dir);
        let resource = Uri::new("https://pod.example/data/orphan.json");
        assert!(acls.read_own_acl(&resource).await.expect("read").is_none());
        assert!(acls.read_fallback_acl(&resource).await.expect("read").is_none());
    }
}
