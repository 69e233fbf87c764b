//! Meshpod Access - Decision, Notification, and ACL Logic
//!
//! The stateful heart of the dataspace core: deciding access requests,
//! applying the resulting permission changes, delivering decision records,
//! sweeping expirations, and counting unseen inbox activity.
//!
//! # Components
//!
//! - [`InboxResolver`]: locates a party's inbox from its identity document
//! - [`NotificationStore`]: typed records inside a container
//! - [`AclReconciler`]: per-resource permission resolution and mutation
//! - [`AccessDecisionEngine`]: the request lifecycle owner
//! - [`UnreadActivityTracker`] / [`UnreadPoller`]: watermark-based unread
//!   counts on a fixed polling interval
//!
//! All components take explicit effect-handler references; none of them
//! retries failed operations.

#![forbid(unsafe_code)]

/// Inbox resolution from identity documents
pub mod inbox;

/// Typed notification records inside a container
pub mod store;

/// ACL resolution and mutation
pub mod acl;

/// Access request lifecycle engine
pub mod engine;

/// Unread activity counting and polling
pub mod unread;

pub use acl::AclReconciler;
pub use engine::{AccessDecisionEngine, EngineConfig, SweepOutcome};
pub use inbox::InboxResolver;
pub use store::NotificationStore;
pub use unread::{PollerConfig, UnreadActivityTracker, UnreadCounts, UnreadPoller, Watermarks};
