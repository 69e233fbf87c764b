//! Filesystem pod storage handler - production only
//!
//! Stateless implementation of `PodStorageEffects` backing a single pod
//! with a local directory tree. Graph resources are stored as JSON
//! documents; containers are directories. Mock handlers belong in
//! `meshpod-testkit`.

use crate::layout::PodLayout;
use async_trait::async_trait;
use meshpod_core::{Graph, PodStorageEffects, StorageError, Uri};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem-backed pod storage for production use.
#[derive(Debug, Clone)]
pub struct FilesystemPodStorage {
    layout: PodLayout,
}

impl FilesystemPodStorage {
    /// Create a handler serving `base_uri` from `base_path`.
    pub fn new(base_uri: Uri, base_path: PathBuf) -> Self {
        Self {
            layout: PodLayout::new(&base_uri, base_path),
        }
    }

    fn read_error(uri: &Uri, err: std::io::Error) -> StorageError {
        if err.kind() == ErrorKind::NotFound {
            StorageError::NotFound {
                uri: uri.to_string(),
            }
        } else {
            StorageError::ReadFailed {
                uri: uri.to_string(),
                message: err.to_string(),
            }
        }
    }

    fn write_error(uri: &Uri, err: std::io::Error) -> StorageError {
        StorageError::WriteFailed {
            uri: uri.to_string(),
            message: err.to_string(),
        }
    }

    async fn write_document(uri: &Uri, path: &Path, graph: &Graph) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(graph).map_err(|e| StorageError::WriteFailed {
            uri: uri.to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::write_error(uri, e))?;
        }
        fs::write(path, body)
            .await
            .map_err(|e| Self::write_error(uri, e))
    }

    fn sanitize_slug(slug_hint: &str) -> String {
        let slug: String = slug_hint
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        let slug = slug.trim_matches('-').to_string();
        if slug.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            slug
        }
    }
}

#[async_trait]
impl PodStorageEffects for FilesystemPodStorage {
    async fn read_graph(&self, uri: &Uri) -> Result<Graph, StorageError> {
        let path = self.layout.resource_file(uri)?;
        let body = fs::read(&path)
            .await
            .map_err(|e| Self::read_error(uri, e))?;
        serde_json::from_slice(&body).map_err(|e| StorageError::ReadFailed {
            uri: uri.to_string(),
            message: format!("malformed graph document: {}", e),
        })
    }

    async fn write_graph(&self, uri: &Uri, graph: &Graph) -> Result<(), StorageError> {
        let path = self.layout.resource_file(uri)?;
        Self::write_document(uri, &path, graph).await
    }

    async fn create_contained(
        &self,
        container: &Uri,
        graph: &Graph,
        slug_hint: &str,
    ) -> Result<Uri, StorageError> {
        let dir = self.layout.container_dir(container)?;
        let meta = fs::metadata(&dir)
            .await
            .map_err(|e| Self::read_error(container, e))?;
        if !meta.is_dir() {
            return Err(StorageError::Invalid {
                message: format!("{} is not a container", container),
            });
        }

        // The caller's slug is advisory; collisions get a fresh suffix.
        let slug = Self::sanitize_slug(slug_hint);
        let mut name = slug.clone();
        loop {
            let candidate = dir.join(format!("{}.json", name));
            match fs::metadata(&candidate).await {
                Err(e) if e.kind() == ErrorKind::NotFound => break,
                Err(e) => return Err(Self::read_error(container, e)),
                Ok(_) => {
                    name = format!("{}-{}", slug, &uuid::Uuid::new_v4().to_string()[..8]);
                }
            }
        }

        let uri = container.join(&name);
        let path = dir.join(format!("{}.json", name));
        Self::write_document(&uri, &path, graph).await?;
        Ok(uri)
    }

    async fn delete_resource(&self, uri: &Uri) -> Result<(), StorageError> {
        let path = self.layout.resource_file(uri)?;
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound {
                    uri: uri.to_string(),
                }
            } else {
                StorageError::DeleteFailed {
                    uri: uri.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    async fn list_container(&self, container: &Uri) -> Result<Vec<Uri>, StorageError> {
        let dir = self.layout.container_dir(container)?;
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| Self::read_error(container, e))?;

        let mut members = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Self::read_error(container, e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Self::read_error(container, e))?;
            if file_type.is_dir() {
                members.push(container.join(&format!("{}/", name)));
            } else if let Some(stem) = name.strip_suffix(".json") {
                // ACL sidecars are metadata, not container members.
                if !stem.ends_with(".acl") && !stem.starts_with('.') {
                    members.push(container.join(stem));
                }
            }
        }
        members.sort();
        Ok(members)
    }

    async fn ensure_container(&self, container: &Uri) -> Result<bool, StorageError> {
        let dir = self.layout.container_dir(container)?;
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(false),
            Ok(_) => Err(StorageError::Invalid {
                message: format!("{} exists but is not a container", container),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&dir)
                    .await
                    .map_err(|e| Self::write_error(container, e))?;
                Ok(true)
            }
            Err(e) => Err(Self::read_error(container, e)),
        }
    }
}
