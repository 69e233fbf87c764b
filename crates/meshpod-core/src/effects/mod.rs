//! Pure effect interfaces
//!
//! Trait signatures only; production handlers live in `meshpod-effects`,
//! deterministic test handlers in `meshpod-testkit`. Components receive
//! explicit handler references instead of relying on process-wide
//! singletons.

pub mod acl;
pub mod storage;
pub mod time;

pub use acl::{AclEffects, AclError};
pub use storage::{PodStorageEffects, StorageError};
pub use time::PhysicalTimeEffects;

use std::sync::Arc;

/// Shared reference to a pod storage handler.
pub type PodStorageRef = Arc<dyn PodStorageEffects>;

/// Shared reference to an ACL handler.
pub type AclRef = Arc<dyn AclEffects>;

/// Shared reference to a physical time handler.
pub type ClockRef = Arc<dyn PhysicalTimeEffects>;
