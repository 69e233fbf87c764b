//! Notification and registry record model
//!
//! Typed views over [`Graph`] resources. A graph is a notification when its
//! type-set contains the access-decision or access-request type; anything
//! else is not a notification and is excluded from result sets. Parsing is
//! total: malformed records yield `None`, never an error.

use crate::graph::Graph;
use crate::identifiers::{PartyId, Uri};
use crate::vocab;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Format a timestamp as the RFC 3339 literal stored in graphs.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

// =============================================================================
// Request lifecycle
// =============================================================================

/// Lifecycle status of an access request.
///
/// Transitions are strictly forward: `pending → {approved, denied}`,
/// `approved → {revoked, expired}`; `denied`, `revoked` and `expired` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting a decision by the owner
    Pending,
    /// Access granted
    Approved,
    /// Access refused
    Denied,
    /// A prior approval was withdrawn
    Revoked,
    /// A prior approval ran past its expiration
    Expired,
}

impl RequestStatus {
    /// Stored literal for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Denied => "denied",
            RequestStatus::Revoked => "revoked",
            RequestStatus::Expired => "expired",
        }
    }

    /// Parse a stored literal.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "denied" => Some(RequestStatus::Denied),
            "revoked" => Some(RequestStatus::Revoked),
            "expired" => Some(RequestStatus::Expired),
            _ => None,
        }
    }

    /// Whether no further transition is allowed from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Denied | RequestStatus::Revoked | RequestStatus::Expired
        )
    }

    /// Whether the lifecycle permits moving from this status to `next`.
    pub fn can_transition(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Denied)
                | (RequestStatus::Approved, RequestStatus::Revoked)
                | (RequestStatus::Approved, RequestStatus::Expired)
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome recorded on an access decision record.
///
/// Mirrors [`RequestStatus`] without the `pending` state: a decision record
/// always carries a settled outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Access granted
    Approved,
    /// Access refused
    Denied,
    /// A prior approval was withdrawn
    Revoked,
    /// A prior approval ran past its expiration
    Expired,
}

impl Decision {
    /// Stored literal for this decision.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Denied => "denied",
            Decision::Revoked => "revoked",
            Decision::Expired => "expired",
        }
    }

    /// Parse a stored literal.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(Decision::Approved),
            "denied" => Some(Decision::Denied),
            "revoked" => Some(Decision::Revoked),
            "expired" => Some(Decision::Expired),
            _ => None,
        }
    }

    /// The request status this decision settles into.
    pub fn resulting_status(&self) -> RequestStatus {
        match self {
            Decision::Approved => RequestStatus::Approved,
            Decision::Denied => RequestStatus::Denied,
            Decision::Revoked => RequestStatus::Revoked,
            Decision::Expired => RequestStatus::Expired,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Access request
// =============================================================================

/// An access request received in the owner's inbox.
///
/// Created externally by the requester writing into the inbox; owned and
/// mutated only by the decision engine acting for the dataset owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// URI of the request record inside the inbox container
    pub uri: Uri,
    /// Current lifecycle status
    pub status: RequestStatus,
    /// Identity URI of the requesting party
    pub requester_id: PartyId,
    /// Display name of the requesting party
    pub requester_name: String,
    /// Contact email of the requesting party
    pub requester_email: String,
    /// Stable identifier of the requested dataset
    pub dataset_id: String,
    /// Human-readable dataset title
    pub dataset_title: String,
    /// URI of the dataset's primary data resource
    pub dataset_access_url: Uri,
    /// URI of the dataset's semantic model resource, if any
    pub dataset_semantic_model_url: Option<Uri>,
    /// URI of the catalog listing the dataset, if any
    pub catalog_url: Option<Uri>,
    /// Free-text message from the requester
    pub message: String,
    /// Comment attached by the deciding party, if any
    pub decision_comment: Option<String>,
    /// Expiration of a granted access, if bounded
    pub expires_at: Option<DateTime<Utc>>,
    /// When the decision was taken
    pub decided_at: Option<DateTime<Utc>>,
    /// Who took the decision
    pub decided_by: Option<PartyId>,
    /// When the request was created
    pub created_at: DateTime<Utc>,
}

impl AccessRequest {
    /// Parse a request from its stored graph. Returns `None` when the graph
    /// is not typed as a request or lacks required fields.
    pub fn from_graph(uri: Uri, graph: &Graph) -> Option<Self> {
        if !graph.has_type(vocab::TYPE_ACCESS_REQUEST) {
            return None;
        }
        let status = RequestStatus::parse(graph.first(vocab::STATUS)?)?;
        let created_at = parse_timestamp(graph.first(vocab::CREATED)?)?;
        Some(AccessRequest {
            uri,
            status,
            requester_id: Uri::new(graph.first(vocab::REQUESTER)?),
            requester_name: graph.first(vocab::REQUESTER_NAME).unwrap_or("").to_string(),
            requester_email: graph
                .first(vocab::REQUESTER_EMAIL)
                .unwrap_or("")
                .to_string(),
            dataset_id: graph.first(vocab::DATASET)?.to_string(),
            dataset_title: graph.first(vocab::TITLE).unwrap_or("").to_string(),
            dataset_access_url: Uri::new(graph.first(vocab::DATASET_ACCESS_URL)?),
            dataset_semantic_model_url: graph
                .first(vocab::DATASET_SEMANTIC_MODEL_URL)
                .map(Uri::new),
            catalog_url: graph.first(vocab::CATALOG_URL).map(Uri::new),
            message: graph.first(vocab::MESSAGE).unwrap_or("").to_string(),
            decision_comment: graph.first(vocab::DECISION_COMMENT).map(str::to_string),
            expires_at: graph.first(vocab::EXPIRES_AT).and_then(parse_timestamp),
            decided_at: graph.first(vocab::DECIDED_AT).and_then(parse_timestamp),
            decided_by: graph.first(vocab::DECIDED_BY).map(Uri::new),
            created_at,
        })
    }

    /// Serialize this request to its stored graph form.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new().with_type(vocab::TYPE_ACCESS_REQUEST);
        graph.set(vocab::STATUS, self.status.as_str());
        graph.set(vocab::REQUESTER, self.requester_id.as_str());
        graph.set(vocab::REQUESTER_NAME, &self.requester_name);
        graph.set(vocab::REQUESTER_EMAIL, &self.requester_email);
        graph.set(vocab::DATASET, &self.dataset_id);
        graph.set(vocab::TITLE, &self.dataset_title);
        graph.set(vocab::DATASET_ACCESS_URL, self.dataset_access_url.as_str());
        if let Some(url) = &self.dataset_semantic_model_url {
            graph.set(vocab::DATASET_SEMANTIC_MODEL_URL, url.as_str());
        }
        if let Some(url) = &self.catalog_url {
            graph.set(vocab::CATALOG_URL, url.as_str());
        }
        graph.set(vocab::MESSAGE, &self.message);
        if let Some(comment) = &self.decision_comment {
            graph.set(vocab::DECISION_COMMENT, comment);
        }
        if let Some(ts) = self.expires_at {
            graph.set(vocab::EXPIRES_AT, format_timestamp(ts));
        }
        if let Some(ts) = self.decided_at {
            graph.set(vocab::DECIDED_AT, format_timestamp(ts));
        }
        if let Some(party) = &self.decided_by {
            graph.set(vocab::DECIDED_BY, party.as_str());
        }
        graph.set(vocab::CREATED, format_timestamp(self.created_at));
        graph
    }

    /// Whether a granted access has run past its expiration.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == RequestStatus::Approved
            && self.expires_at.map(|exp| exp < now).unwrap_or(false)
    }

    /// The resources a grant or revoke applies to: the access URL and, when
    /// present, the semantic model URL.
    pub fn dataset_resources(&self) -> Vec<Uri> {
        let mut resources = vec![self.dataset_access_url.clone()];
        if let Some(url) = &self.dataset_semantic_model_url {
            resources.push(url.clone());
        }
        resources
    }
}

// =============================================================================
// Access decision
// =============================================================================

/// A decision notification delivered into the requester's inbox.
///
/// Write-once; never mutated after delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// URI of the decision record inside the requester's inbox
    pub uri: Uri,
    /// Settled outcome
    pub decision: Decision,
    /// Identity URI of the requesting party
    pub requester_id: PartyId,
    /// Stable identifier of the dataset the decision concerns
    pub dataset_id: String,
    /// Human-readable dataset title
    pub dataset_title: String,
    /// URI of the dataset's primary data resource
    pub dataset_access_url: Uri,
    /// Comment attached by the deciding party, if any
    pub decision_comment: Option<String>,
    /// Expiration of the granted access, if bounded
    pub expires_at: Option<DateTime<Utc>>,
    /// When the decision record was created
    pub created_at: DateTime<Utc>,
}

impl AccessDecision {
    /// Parse a decision from its stored graph. Returns `None` when the graph
    /// is not typed as a decision or lacks required fields.
    pub fn from_graph(uri: Uri, graph: &Graph) -> Option<Self> {
        if !graph.has_type(vocab::TYPE_ACCESS_DECISION) {
            return None;
        }
        let decision = Decision::parse(graph.first(vocab::DECISION)?)?;
        let created_at = parse_timestamp(graph.first(vocab::CREATED)?)?;
        Some(AccessDecision {
            uri,
            decision,
            requester_id: Uri::new(graph.first(vocab::REQUESTER)?),
            dataset_id: graph.first(vocab::DATASET)?.to_string(),
            dataset_title: graph.first(vocab::TITLE).unwrap_or("").to_string(),
            dataset_access_url: Uri::new(graph.first(vocab::DATASET_ACCESS_URL)?),
            decision_comment: graph.first(vocab::DECISION_COMMENT).map(str::to_string),
            expires_at: graph.first(vocab::EXPIRES_AT).and_then(parse_timestamp),
            created_at,
        })
    }

    /// Serialize this decision to its stored graph form.
    pub fn to_graph(&self) -> Graph {
        Self::build_graph(
            self.decision,
            &self.requester_id,
            &self.dataset_id,
            &self.dataset_title,
            &self.dataset_access_url,
            self.decision_comment.as_deref(),
            self.expires_at,
            self.created_at,
        )
    }

    /// Build the stored graph for a fresh decision record, before the
    /// server has assigned it an identifier.
    #[allow(clippy::too_many_arguments)]
    pub fn build_graph(
        decision: Decision,
        requester_id: &PartyId,
        dataset_id: &str,
        dataset_title: &str,
        dataset_access_url: &Uri,
        decision_comment: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Graph {
        let mut graph = Graph::new().with_type(vocab::TYPE_ACCESS_DECISION);
        graph.set(vocab::DECISION, decision.as_str());
        graph.set(vocab::REQUESTER, requester_id.as_str());
        graph.set(vocab::DATASET, dataset_id);
        graph.set(vocab::TITLE, dataset_title);
        graph.set(vocab::DATASET_ACCESS_URL, dataset_access_url.as_str());
        if let Some(comment) = decision_comment {
            graph.set(vocab::DECISION_COMMENT, comment);
        }
        if let Some(ts) = expires_at {
            graph.set(vocab::EXPIRES_AT, format_timestamp(ts));
        }
        graph.set(vocab::CREATED, format_timestamp(created_at));
        graph
    }
}

// =============================================================================
// Notification
// =============================================================================

/// A typed record found in an inbox container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// An incoming access request
    Request(AccessRequest),
    /// An incoming access decision
    Decision(AccessDecision),
}

impl Notification {
    /// Classify and parse a graph resource.
    ///
    /// The decision type is tested before the request type: a record is
    /// expected to satisfy at most one kind. Non-notification resources and
    /// malformed records yield `None`.
    pub fn from_graph(uri: Uri, graph: &Graph) -> Option<Self> {
        if graph.has_type(vocab::TYPE_ACCESS_DECISION) {
            return AccessDecision::from_graph(uri, graph).map(Notification::Decision);
        }
        if graph.has_type(vocab::TYPE_ACCESS_REQUEST) {
            return AccessRequest::from_graph(uri, graph).map(Notification::Request);
        }
        None
    }

    /// URI of the underlying record.
    pub fn uri(&self) -> &Uri {
        match self {
            Notification::Request(request) => &request.uri,
            Notification::Decision(decision) => &decision.uri,
        }
    }

    /// Creation timestamp of the underlying record.
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Notification::Request(request) => request.created_at,
            Notification::Decision(decision) => decision.created_at,
        }
    }
}

// =============================================================================
// Registry membership
// =============================================================================

/// A membership record inside a discovery registry container.
///
/// One record per (container, member) pair; append/delete only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMembership {
    /// URI of the membership record
    pub uri: Uri,
    /// Identity URI of the registered member
    pub member_id: PartyId,
    /// Last-modified timestamp
    pub modified_at: DateTime<Utc>,
}

impl RegistryMembership {
    /// Parse a membership record from its stored graph.
    pub fn from_graph(uri: Uri, graph: &Graph) -> Option<Self> {
        if !graph.has_type(vocab::TYPE_REGISTRY_MEMBERSHIP) {
            return None;
        }
        Some(RegistryMembership {
            uri,
            member_id: Uri::new(graph.first(vocab::MEMBER)?),
            modified_at: parse_timestamp(graph.first(vocab::MODIFIED)?)?,
        })
    }

    /// Build the stored graph naming `member` as a registry member.
    pub fn membership_graph(member: &PartyId, modified_at: DateTime<Utc>) -> Graph {
        Graph::new()
            .with_type(vocab::TYPE_REGISTRY_MEMBERSHIP)
            .with_field(vocab::MEMBER, member.as_str())
            .with_field(vocab::MODIFIED, format_timestamp(modified_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    fn sample_request() -> AccessRequest {
        AccessRequest {
            uri: Uri::new("https://owner.example/inbox/req-1"),
            status: RequestStatus::Pending,
            requester_id: Uri::new("https://requester.example/profile#me"),
            requester_name: "Ada".to_string(),
            requester_email: "ada@example.org".to_string(),
            dataset_id: "dataset-1".to_string(),
            dataset_title: "Sensor readings".to_string(),
            dataset_access_url: Uri::new("https://owner.example/data/sensor.json"),
            dataset_semantic_model_url: Some(Uri::new("https://owner.example/data/sensor.model")),
            catalog_url: None,
            message: "May I read this?".to_string(),
            decision_comment: None,
            expires_at: None,
            decided_at: None,
            decided_by: None,
            created_at: ts(1_700_000_000),
        }
    }

    #[test]
    fn request_graph_round_trip() {
        let request = sample_request();
        let graph = request.to_graph();
        let parsed = AccessRequest::from_graph(request.uri.clone(), &graph).expect("parse");
        assert_eq!(parsed, request);
    }

    #[test]
    fn lifecycle_transitions() {
        use RequestStatus::*;
        assert!(Pending.can_transition(Approved));
        assert!(Pending.can_transition(Denied));
        assert!(Approved.can_transition(Revoked));
        assert!(Approved.can_transition(Expired));

        assert!(!Pending.can_transition(Revoked));
        assert!(!Approved.can_transition(Denied));
        for terminal in [Denied, Revoked, Expired] {
            assert!(terminal.is_terminal());
            for next in [Pending, Approved, Denied, Revoked, Expired] {
                assert!(!terminal.can_transition(next));
            }
        }
    }

    #[test]
    fn decision_type_tested_before_request_type() {
        let mut graph = AccessDecision {
            uri: Uri::new("https://requester.example/inbox/dec-1"),
            decision: Decision::Approved,
            requester_id: Uri::new("https://requester.example/profile#me"),
            dataset_id: "dataset-1".to_string(),
            dataset_title: "Sensor readings".to_string(),
            dataset_access_url: Uri::new("https://owner.example/data/sensor.json"),
            decision_comment: None,
            expires_at: None,
            created_at: ts(1_700_000_100),
        }
        .to_graph();
        // A pathological record asserting both types classifies as a decision.
        graph.add_type(vocab::TYPE_ACCESS_REQUEST);

        let parsed = Notification::from_graph(Uri::new("https://x.example/n"), &graph);
        assert!(matches!(parsed, Some(Notification::Decision(_))));
    }

    #[test]
    fn untyped_graph_is_not_a_notification() {
        let graph = Graph::new().with_field(vocab::MESSAGE, "hello");
        assert_eq!(
            Notification::from_graph(Uri::new("https://x.example/n"), &graph),
            None
        );
    }

    #[test]
    fn malformed_request_yields_none() {
        let mut graph = sample_request().to_graph();
        graph.set(vocab::STATUS, "definitely-not-a-status");
        assert!(AccessRequest::from_graph(Uri::new("https://x.example/r"), &graph).is_none());

        let mut graph = sample_request().to_graph();
        graph.remove(vocab::CREATED);
        assert!(AccessRequest::from_graph(Uri::new("https://x.example/r"), &graph).is_none());
    }

    #[test]
    fn expiry_requires_approved_status() {
        let mut request = sample_request();
        request.expires_at = Some(ts(1_700_000_500));

        assert!(!request.is_expired(ts(1_700_001_000)));
        request.status = RequestStatus::Approved;
        assert!(request.is_expired(ts(1_700_001_000)));
        assert!(!request.is_expired(ts(1_700_000_000)));
    }

    #[test]
    fn membership_graph_round_trip() {
        let member = Uri::new("https://owner.example/profile#me");
        let graph = RegistryMembership::membership_graph(&member, ts(1_700_000_000));
        let parsed =
            RegistryMembership::from_graph(Uri::new("https://reg.example/registry/m-1"), &graph)
                .expect("parse");
        assert_eq!(parsed.member_id, member);
        assert_eq!(parsed.modified_at, ts(1_700_000_000));
    }
}
