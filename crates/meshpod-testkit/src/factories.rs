//! Record and fixture factories
//!
//! Small builders for the graphs and records tests keep re-creating:
//! identity documents, pending access requests, seeded inboxes.

use crate::storage::MemoryPodStorage;
use chrono::{DateTime, Utc};
use meshpod_core::{vocab, AccessRequest, Graph, PartyId, RequestStatus, Uri};

/// Identity URI for a named test party.
pub fn party(name: &str) -> PartyId {
    Uri::new(format!("https://{}.example/profile#me", name))
}

/// Inbox container URI for a named test party.
pub fn inbox(name: &str) -> Uri {
    Uri::new(format!("https://{}.example/inbox/", name))
}

/// An identity document linking to an inbox and optionally a catalog.
pub fn identity_document(inbox: &Uri, catalog: Option<&Uri>) -> Graph {
    let mut document = Graph::new().with_field(vocab::INBOX, inbox.as_str());
    if let Some(catalog) = catalog {
        document.set(vocab::CATALOG, catalog.as_str());
    }
    document
}

/// Seed a party's identity document and empty inbox container.
pub fn seed_party(storage: &MemoryPodStorage, party: &PartyId, inbox: &Uri) {
    storage.insert_graph(party, identity_document(inbox, None));
    storage.insert_container(inbox);
}

/// A pending access request with sensible defaults.
pub fn pending_request(
    uri: Uri,
    requester: PartyId,
    dataset_access_url: Uri,
    created_at: DateTime<Utc>,
) -> AccessRequest {
    AccessRequest {
        uri,
        status: RequestStatus::Pending,
        requester_id: requester,
        requester_name: "Test Requester".to_string(),
        requester_email: "requester@example.org".to_string(),
        dataset_id: "dataset-1".to_string(),
        dataset_title: "Test dataset".to_string(),
        dataset_access_url,
        dataset_semantic_model_url: None,
        catalog_url: None,
        message: "Requesting access for testing.".to_string(),
        decision_comment: None,
        expires_at: None,
        decided_at: None,
        decided_by: None,
        created_at,
    }
}

/// Store a request's graph at its own URI, registering the inbox container.
pub fn seed_request(storage: &MemoryPodStorage, request: &AccessRequest) {
    storage.insert_graph(&request.uri, request.to_graph());
}
