//! Meshpod Testkit - Deterministic Effect Handlers and Fixtures
//!
//! In-memory implementations of the `meshpod-core` effect interfaces with
//! failure injection, a manually advanced clock, and factories for the
//! records tests keep re-creating. Test infrastructure only; production
//! handlers live in `meshpod-effects`.

#![forbid(unsafe_code)]

/// In-memory pod storage with poisoning
pub mod storage;

/// In-memory ACL store with failure injection
pub mod acl;

/// Manually advanced clock
pub mod clock;

/// Record and fixture factories
pub mod factories;

pub use acl::MemoryAclStore;
pub use clock::ManualClock;
pub use storage::MemoryPodStorage;
