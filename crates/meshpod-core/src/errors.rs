//! Unified error system for Meshpod core operations
//!
//! A single flat error type covering the taxonomy the decision and registry
//! logic actually distinguishes: not-found, unavailable ACLs, network and
//! parse degradation, storage failures, best-effort delivery failures, and
//! rejected lifecycle transitions.

use serde::{Deserialize, Serialize};

/// Unified error type for all Meshpod operations
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum MeshpodError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Description of the invalid input
        message: String,
    },

    /// Container or resource absent
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was not found
        message: String,
    },

    /// No accessible permission list, own or inherited
    #[error("ACL unavailable: {message}")]
    AclUnavailable {
        /// Description of the resource lacking an ACL
        message: String,
    },

    /// Network or transport error
    #[error("Network error: {message}")]
    Network {
        /// Description of the network failure
        message: String,
    },

    /// A record could not be parsed as a typed graph
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse failure
        message: String,
    },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// Best-effort notification delivery failed
    #[error("Delivery failed: {message}")]
    Delivery {
        /// Description of the delivery failure
        message: String,
    },

    /// A lifecycle transition was rejected
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current status of the record
        from: String,
        /// Status the caller attempted to move to
        to: String,
    },
}

impl MeshpodError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an ACL unavailable error
    pub fn acl_unavailable(message: impl Into<String>) -> Self {
        Self::AclUnavailable {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a delivery error
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }

    /// Create an invalid transition error
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Whether this error is the not-found category
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for Meshpod operations
pub type MeshpodResult<T> = Result<T, MeshpodError>;
