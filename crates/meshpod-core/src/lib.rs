//! Meshpod Core - Foundational Types and Effect Interfaces
//!
//! This crate provides the shared vocabulary of the Meshpod dataspace core:
//! identifiers, the small-graph resource model, notification and registry
//! record types, permission lists, and the pure effect interfaces the
//! decision and registry logic is written against.
//!
//! # Architecture
//!
//! - Types here are plain data with serde support and no I/O.
//! - Effect traits (`effects`) are pure signatures; production handlers
//!   live in `meshpod-effects`, deterministic ones in `meshpod-testkit`.
//! - Components take explicit handler references (`PodStorageRef`,
//!   `AclRef`, `ClockRef`) rather than process-wide singletons.

#![forbid(unsafe_code)]

/// Resource and party identifiers
pub mod identifiers;

/// Small typed graph resources and field-delta semantics
pub mod graph;

/// Vocabulary IRIs for records and identity-document links
pub mod vocab;

/// Notification and registry record model
pub mod model;

/// Per-resource permission lists
pub mod acl;

/// Registry participation configuration
pub mod registry;

/// Unified error handling
pub mod errors;

/// Pure effect interfaces
pub mod effects;

pub use acl::{AccessModes, AclDocument, ResolvedAcl};
pub use effects::{
    AclEffects, AclError, AclRef, ClockRef, PhysicalTimeEffects, PodStorageEffects, PodStorageRef,
    StorageError,
};
pub use errors::{MeshpodError, MeshpodResult};
pub use graph::{FieldDeltas, Graph};
pub use identifiers::{PartyId, Uri};
pub use model::{
    AccessDecision, AccessRequest, Decision, Notification, RegistryMembership, RequestStatus,
};
pub use registry::{RegistryConfig, RegistryMode};
