//! Per-resource permission lists
//!
//! An ACL grants each agent a subset of the four flags
//! {read, append, write, control}. An agent entry with no flags set is
//! equivalent to no entry at all, so setting empty modes removes the entry.

use crate::identifiers::{PartyId, Uri};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four-flag permission set for one agent on one resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessModes {
    /// Read the resource
    pub read: bool,
    /// Append to the resource
    pub append: bool,
    /// Overwrite or delete the resource
    pub write: bool,
    /// Change the resource's permission list
    pub control: bool,
}

impl AccessModes {
    /// No permissions; setting this on an agent is a full revoke.
    pub const fn none() -> Self {
        Self {
            read: false,
            append: false,
            write: false,
            control: false,
        }
    }

    /// All four flags. An approval grants this: delegation, not a
    /// read-only grant.
    pub const fn full() -> Self {
        Self {
            read: true,
            append: true,
            write: true,
            control: true,
        }
    }

    /// Read flag only.
    pub const fn read_only() -> Self {
        Self {
            read: true,
            append: false,
            write: false,
            control: false,
        }
    }

    /// Whether no flag is set.
    pub fn is_empty(&self) -> bool {
        !(self.read || self.append || self.write || self.control)
    }
}

/// The permission list of a single resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclDocument {
    /// Per-agent entries
    #[serde(default)]
    agents: BTreeMap<PartyId, AccessModes>,
    /// Grant applying to any agent, if present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    public: Option<AccessModes>,
}

impl AclDocument {
    /// Create an empty permission list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective modes for one agent (public grant not folded in).
    pub fn agent_modes(&self, agent: &PartyId) -> AccessModes {
        self.agents.get(agent).copied().unwrap_or_default()
    }

    /// Replace (not merge) the entry for one agent. Empty modes remove the
    /// entry entirely.
    pub fn set_agent(&mut self, agent: PartyId, modes: AccessModes) {
        if modes.is_empty() {
            self.agents.remove(&agent);
        } else {
            self.agents.insert(agent, modes);
        }
    }

    /// Replace the public grant. Empty modes remove it.
    pub fn set_public(&mut self, modes: AccessModes) {
        self.public = if modes.is_empty() { None } else { Some(modes) };
    }

    /// The public grant, if any.
    pub fn public_modes(&self) -> AccessModes {
        self.public.unwrap_or_default()
    }

    /// Iterate over per-agent entries.
    pub fn agents(&self) -> impl Iterator<Item = (&PartyId, &AccessModes)> {
        self.agents.iter()
    }

    /// Whether the list grants nothing to anyone.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() && self.public.is_none()
    }
}

/// Result of resolving the effective ACL for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAcl {
    /// The resource the ACL applies to
    pub resource: Uri,
    /// The effective permission list
    pub document: AclDocument,
    /// Whether the document was materialized from an inherited list rather
    /// than read as the resource's own
    pub materialized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_modes_remove_agent_entry() {
        let agent = Uri::new("https://requester.example/profile#me");
        let mut acl = AclDocument::new();
        acl.set_agent(agent.clone(), AccessModes::full());
        assert_eq!(acl.agent_modes(&agent), AccessModes::full());

        acl.set_agent(agent.clone(), AccessModes::none());
        assert_eq!(acl.agent_modes(&agent), AccessModes::none());
        assert!(acl.is_empty());
    }

    #[test]
    fn set_agent_replaces_not_merges() {
        let agent = Uri::new("https://requester.example/profile#me");
        let mut acl = AclDocument::new();
        acl.set_agent(agent.clone(), AccessModes::full());
        acl.set_agent(agent.clone(), AccessModes::read_only());
        let modes = acl.agent_modes(&agent);
        assert!(modes.read && !modes.write && !modes.append && !modes.control);
    }

    #[test]
    fn public_grant_is_independent() {
        let mut acl = AclDocument::new();
        acl.set_public(AccessModes::read_only());
        assert_eq!(acl.public_modes(), AccessModes::read_only());
        assert_eq!(
            acl.agent_modes(&Uri::new("https://anyone.example/#me")),
            AccessModes::none()
        );
    }
}
