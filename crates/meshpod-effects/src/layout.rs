//! URI ↔ filesystem mapping shared by the filesystem handlers

use meshpod_core::{StorageError, Uri};
use std::path::PathBuf;

/// Maps URIs under one base URI onto a directory tree.
///
/// Containers become directories, contained graph resources become
/// `<name>.json` documents.
#[derive(Debug, Clone)]
pub(crate) struct PodLayout {
    base_uri: String,
    base_path: PathBuf,
}

impl PodLayout {
    pub(crate) fn new(base_uri: &Uri, base_path: PathBuf) -> Self {
        let mut base = base_uri.as_str().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            base_uri: base,
            base_path,
        }
    }

    fn relative(&self, uri: &Uri) -> Result<String, StorageError> {
        let rest = uri
            .as_str()
            .strip_prefix(&self.base_uri)
            .ok_or_else(|| StorageError::Invalid {
                message: format!("{} is outside the handler base {}", uri, self.base_uri),
            })?;
        if rest.split('/').any(|segment| segment == "..") {
            return Err(StorageError::Invalid {
                message: format!("{} contains a parent traversal", uri),
            });
        }
        Ok(rest.to_string())
    }

    /// Directory backing a container URI.
    pub(crate) fn container_dir(&self, container: &Uri) -> Result<PathBuf, StorageError> {
        let rest = self.relative(container)?;
        Ok(self.base_path.join(rest.trim_end_matches('/')))
    }

    /// Document backing a contained resource URI.
    pub(crate) fn resource_file(&self, uri: &Uri) -> Result<PathBuf, StorageError> {
        let rest = self.relative(uri)?;
        if rest.is_empty() || rest.ends_with('/') {
            return Err(StorageError::Invalid {
                message: format!("{} names a container, not a resource", uri),
            });
        }
        Ok(self.base_path.join(format!("{}.json", rest)))
    }

    /// Sidecar ACL document for a resource or container URI.
    pub(crate) fn acl_file(&self, uri: &Uri) -> Result<PathBuf, StorageError> {
        let rest = self.relative(uri)?;
        if rest.is_empty() || rest.ends_with('/') {
            Ok(self
                .base_path
                .join(rest.trim_end_matches('/'))
                .join(".acl.json"))
        } else {
            Ok(self.base_path.join(format!("{}.acl.json", rest)))
        }
    }

    /// Whether a URI falls under this handler's base.
    pub(crate) fn contains(&self, uri: &Uri) -> bool {
        uri.as_str().starts_with(&self.base_uri)
    }
}
