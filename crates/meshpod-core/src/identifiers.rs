//! Resource and party identifiers
//!
//! Everything in a dataspace is addressed by a stable global URI: parties,
//! pods, containers, contained resources. `Uri` is a thin newtype so the
//! rest of the codebase cannot confuse resource addresses with arbitrary
//! strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A global resource identifier.
///
/// Containers conventionally end with a trailing slash; contained resources
/// do not. No syntactic validation is performed beyond that convention;
/// the storage substrate is the authority on what resolves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uri(String);

impl Uri {
    /// Wrap a URI string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this URI names a container (trailing slash convention).
    pub fn is_container(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Join a member name onto this URI, treating it as a container.
    pub fn join(&self, member: &str) -> Uri {
        let member = member.trim_start_matches('/');
        if self.0.ends_with('/') {
            Uri(format!("{}{}", self.0, member))
        } else {
            Uri(format!("{}/{}", self.0, member))
        }
    }

    /// The parent container of this URI, if it has one.
    ///
    /// `https://pod.example/inbox/req-1` → `https://pod.example/inbox/`.
    /// Returns `None` once the authority root is reached.
    pub fn parent_container(&self) -> Option<Uri> {
        let trimmed = self.0.trim_end_matches('/');
        let split = trimmed.rfind('/')?;
        // Do not walk above `scheme://host/`.
        if trimmed[..split].ends_with('/') || trimmed[..split].ends_with(':') {
            return None;
        }
        Some(Uri(trimmed[..=split].to_string()))
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uri {
    fn from(value: &str) -> Self {
        Uri(value.to_string())
    }
}

impl From<String> for Uri {
    fn from(value: String) -> Self {
        Uri(value)
    }
}

/// Identifier of a dataspace party.
///
/// Parties are identified by the URI of their discoverable identity
/// document, so this is an alias rather than a distinct type.
pub type PartyId = Uri;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_respects_trailing_slash() {
        let container = Uri::new("https://pod.example/inbox/");
        assert_eq!(
            container.join("req-1").as_str(),
            "https://pod.example/inbox/req-1"
        );
        let bare = Uri::new("https://pod.example/inbox");
        assert_eq!(
            bare.join("req-1").as_str(),
            "https://pod.example/inbox/req-1"
        );
    }

    #[test]
    fn parent_container_walks_up() {
        let resource = Uri::new("https://pod.example/inbox/req-1");
        let parent = resource.parent_container().unwrap();
        assert_eq!(parent.as_str(), "https://pod.example/inbox/");

        let container = Uri::new("https://pod.example/inbox/");
        let root = container.parent_container().unwrap();
        assert_eq!(root.as_str(), "https://pod.example/");
    }

    #[test]
    fn parent_container_stops_at_authority_root() {
        let root = Uri::new("https://pod.example/");
        assert_eq!(root.parent_container(), None);
    }
}
