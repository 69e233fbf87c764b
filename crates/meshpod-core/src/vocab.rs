//! Vocabulary IRIs for notification and registry records
//!
//! A private vocabulary carries the dataspace-specific fields; two general
//! properties (creation timestamp, title) are reused from Dublin Core, and
//! the inbox link comes from LDP.

/// Namespace of the private dataspace vocabulary.
pub const NS: &str = "https://w3id.org/meshpod/vocab#";

// --- Record types ---

/// Type IRI of an access request record.
pub const TYPE_ACCESS_REQUEST: &str = "https://w3id.org/meshpod/vocab#AccessRequest";
/// Type IRI of an access decision record.
pub const TYPE_ACCESS_DECISION: &str = "https://w3id.org/meshpod/vocab#AccessDecision";
/// Type IRI of a registry membership record.
pub const TYPE_REGISTRY_MEMBERSHIP: &str = "https://w3id.org/meshpod/vocab#RegistryMembership";

// --- Identity document links ---

/// Link from an identity document to the party's inbox container.
pub const INBOX: &str = "http://www.w3.org/ns/ldp#inbox";
/// Link from an identity document to the party's catalog resource.
pub const CATALOG: &str = "https://w3id.org/meshpod/vocab#catalog";

// --- Reused general properties ---

/// Creation timestamp (RFC 3339 literal).
pub const CREATED: &str = "http://purl.org/dc/terms/created";
/// Human-readable title.
pub const TITLE: &str = "http://purl.org/dc/terms/title";

// --- Request / decision fields ---

/// Lifecycle status of an access request.
pub const STATUS: &str = "https://w3id.org/meshpod/vocab#status";
/// Decision recorded on an access decision record.
pub const DECISION: &str = "https://w3id.org/meshpod/vocab#decision";
/// Identity URI of the requesting party.
pub const REQUESTER: &str = "https://w3id.org/meshpod/vocab#requester";
/// Display name of the requesting party.
pub const REQUESTER_NAME: &str = "https://w3id.org/meshpod/vocab#requesterName";
/// Contact email of the requesting party.
pub const REQUESTER_EMAIL: &str = "https://w3id.org/meshpod/vocab#requesterEmail";
/// Stable identifier of the requested dataset.
pub const DATASET: &str = "https://w3id.org/meshpod/vocab#dataset";
/// URI of the dataset's primary data resource.
pub const DATASET_ACCESS_URL: &str = "https://w3id.org/meshpod/vocab#datasetAccessUrl";
/// URI of the dataset's semantic model resource, if any.
pub const DATASET_SEMANTIC_MODEL_URL: &str =
    "https://w3id.org/meshpod/vocab#datasetSemanticModelUrl";
/// URI of the catalog the dataset is listed in, if any.
pub const CATALOG_URL: &str = "https://w3id.org/meshpod/vocab#catalogUrl";
/// Free-text message from the requester.
pub const MESSAGE: &str = "https://w3id.org/meshpod/vocab#message";
/// Free-text comment attached to a decision.
pub const DECISION_COMMENT: &str = "https://w3id.org/meshpod/vocab#decisionComment";
/// Expiration timestamp of a granted access (RFC 3339 literal).
pub const EXPIRES_AT: &str = "https://w3id.org/meshpod/vocab#expiresAt";
/// Timestamp the decision was taken (RFC 3339 literal).
pub const DECIDED_AT: &str = "https://w3id.org/meshpod/vocab#decidedAt";
/// Identity URI of the party that took the decision.
pub const DECIDED_BY: &str = "https://w3id.org/meshpod/vocab#decidedBy";

// --- Registry membership fields ---

/// Identity URI of the registered member.
pub const MEMBER: &str = "https://w3id.org/meshpod/vocab#member";
/// Last-modified timestamp of a membership record (RFC 3339 literal).
pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
