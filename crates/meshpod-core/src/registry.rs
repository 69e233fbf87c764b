//! Dataspace participation configuration
//!
//! A party declares how it participates in discovery: in `research` mode it
//! registers in a set of externally owned shared registries; in `private`
//! mode it registers only in its own private registry container, created on
//! demand. Exactly one mode is active at a time, and membership records
//! should eventually match whichever container set the active mode implies.

use crate::identifiers::Uri;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Participation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryMode {
    /// Register in the configured shared registries
    Research,
    /// Register only in the self-owned private registry
    Private,
}

/// Declared registry participation of a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Active participation mode
    pub mode: RegistryMode,
    /// Shared registry containers, used when `mode` is research. Externally
    /// owned; never created by this party.
    pub registries: BTreeSet<Uri>,
    /// Self-owned registry container, used when `mode` is private. Created
    /// on demand.
    pub private_registry: Uri,
}

impl RegistryConfig {
    /// Research-mode configuration.
    pub fn research(
        registries: impl IntoIterator<Item = Uri>,
        private_registry: Uri,
    ) -> Self {
        Self {
            mode: RegistryMode::Research,
            registries: registries.into_iter().collect(),
            private_registry,
        }
    }

    /// Private-mode configuration.
    pub fn private(private_registry: Uri) -> Self {
        Self {
            mode: RegistryMode::Private,
            registries: BTreeSet::new(),
            private_registry,
        }
    }

    /// The container set the active mode implies membership in.
    pub fn implied_registries(&self) -> BTreeSet<Uri> {
        match self.mode {
            RegistryMode::Research => self.registries.clone(),
            RegistryMode::Private => {
                let mut set = BTreeSet::new();
                set.insert(self.private_registry.clone());
                set
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn research_mode_implies_shared_registries() {
        let config = RegistryConfig::research(
            [Uri::new("https://reg-a.example/"), Uri::new("https://reg-b.example/")],
            Uri::new("https://owner.example/registry/"),
        );
        let implied = config.implied_registries();
        assert_eq!(implied.len(), 2);
        assert!(!implied.contains(&Uri::new("https://owner.example/registry/")));
    }

    #[test]
    fn private_mode_implies_only_private_registry() {
        let config = RegistryConfig::private(Uri::new("https://owner.example/registry/"));
        let implied = config.implied_registries();
        assert_eq!(implied.len(), 1);
        assert!(implied.contains(&Uri::new("https://owner.example/registry/")));
    }
}
