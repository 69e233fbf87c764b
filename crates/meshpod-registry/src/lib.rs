//! Meshpod Registry - Dataspace Participation Sync
//!
//! Keeps a party's membership records in shared discovery containers
//! synchronized with its declared participation configuration. Shares the
//! container primitives with the notification logic but is otherwise
//! independent of it.

#![forbid(unsafe_code)]

/// Registry membership reconciliation
pub mod sync;

pub use sync::{RegistryMembershipSynchronizer, SyncReport};
