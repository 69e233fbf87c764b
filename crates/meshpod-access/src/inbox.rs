//! Inbox resolution from identity documents
//!
//! Every party exposes a discoverable identity document carrying a link to
//! its inbox container and, optionally, to a catalog resource. Resolution
//! failures are not transient errors: `None` means "no inbox configured"
//! and callers must treat it that way.

use meshpod_core::{vocab, PartyId, PodStorageRef, Uri};

/// Locates a party's notification container from its identity document.
#[derive(Clone)]
pub struct InboxResolver {
    storage: PodStorageRef,
}

impl InboxResolver {
    /// Create a resolver over the given storage handler.
    pub fn new(storage: PodStorageRef) -> Self {
        Self { storage }
    }

    async fn resolve_link(&self, party: &PartyId, predicate: &str) -> Option<Uri> {
        let document = match self.storage.read_graph(party).await {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(party = %party, error = %err, "identity document unreachable");
                return None;
            }
        };
        document.first(predicate).map(Uri::new)
    }

    /// The party's inbox container, or `None` when no inbox is configured
    /// or the identity document is unreachable. No retry.
    pub async fn resolve_inbox(&self, party: &PartyId) -> Option<Uri> {
        self.resolve_link(party, vocab::INBOX).await
    }

    /// The party's catalog resource, or `None` when none is linked.
    pub async fn resolve_catalog(&self, party: &PartyId) -> Option<Uri> {
        self.resolve_link(party, vocab::CATALOG).await
    }
}
