//! Small typed graph resources
//!
//! Notification records, membership records, and identity documents are all
//! small graphs: a set of type IRIs plus a predicate → values map. The
//! storage substrate offers no atomic field patches, so mutation follows a
//! read-modify-write contract with per-field remove-then-set semantics.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-field update deltas for [`Graph::apply_deltas`].
///
/// Fields absent from the map are untouched. A `None` (or empty-string)
/// value means "clear the field", not "leave unchanged".
pub type FieldDeltas = BTreeMap<String, Option<String>>;

/// A small typed graph resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Type IRIs this resource is a member of
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    types: BTreeSet<String>,
    /// Predicate → literal values
    #[serde(default)]
    fields: BTreeMap<String, Vec<String>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style type assertion.
    pub fn with_type(mut self, type_iri: &str) -> Self {
        self.add_type(type_iri);
        self
    }

    /// Builder-style single-value field assignment.
    pub fn with_field(mut self, predicate: &str, value: impl Into<String>) -> Self {
        self.set(predicate, value);
        self
    }

    /// Assert a type IRI.
    pub fn add_type(&mut self, type_iri: &str) {
        self.types.insert(type_iri.to_string());
    }

    /// Whether the resource's type-set contains the given IRI.
    pub fn has_type(&self, type_iri: &str) -> bool {
        self.types.contains(type_iri)
    }

    /// Iterate over asserted type IRIs.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    /// The first value for a predicate, if any.
    pub fn first(&self, predicate: &str) -> Option<&str> {
        self.fields
            .get(predicate)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for a predicate.
    pub fn all(&self, predicate: &str) -> &[String] {
        self.fields
            .get(predicate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Replace all values for a predicate with a single value.
    pub fn set(&mut self, predicate: &str, value: impl Into<String>) {
        self.fields.insert(predicate.to_string(), vec![value.into()]);
    }

    /// Append a value for a predicate, keeping existing values.
    pub fn push(&mut self, predicate: &str, value: impl Into<String>) {
        self.fields
            .entry(predicate.to_string())
            .or_default()
            .push(value.into());
    }

    /// Remove all values for a predicate.
    pub fn remove(&mut self, predicate: &str) {
        self.fields.remove(predicate);
    }

    /// Apply one delta: remove all existing values for the predicate, then
    /// set the new value only if it is non-empty.
    pub fn apply(&mut self, predicate: &str, value: Option<&str>) {
        self.remove(predicate);
        if let Some(value) = value {
            if !value.is_empty() {
                self.set(predicate, value);
            }
        }
    }

    /// Apply a set of per-field deltas. Fields not named are untouched.
    pub fn apply_deltas(&mut self, deltas: &FieldDeltas) {
        for (predicate, value) in deltas {
            self.apply(predicate, value.as_deref());
        }
    }

    /// Whether the graph carries no types and no fields.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.fields.is_empty()
    }
}
