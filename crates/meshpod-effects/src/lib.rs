//! Meshpod Effects - Production Effect Handlers
//!
//! Stateless implementations of the effect interfaces declared in
//! `meshpod-core`. These handlers back a pod with a local directory tree
//! and the system clock; mock handlers live in `meshpod-testkit`.

#![forbid(unsafe_code)]

mod layout;

/// Filesystem pod storage handler
pub mod storage;

/// Filesystem ACL handler
pub mod acl;

/// System time handler
pub mod time;

pub use acl::FilesystemAclStore;
pub use storage::FilesystemPodStorage;
pub use time::RealTimeHandler;
