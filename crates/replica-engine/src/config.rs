//! Replicator configuration

use crate::error::ReplicaError;
use serde::{Deserialize, Serialize};

/// Replicator configuration
///
/// Can be built in code or loaded from TOML:
///
/// ```toml
/// max_depth = 64
/// collect_stats = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplicaConfig {
    /// Deepest path (in segments) the traversal may reach; `None` is unbounded
    pub max_depth: Option<usize>,
    /// Whether traversal counters are kept
    pub collect_stats: bool,
}

impl ReplicaConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With depth limit
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// With unbounded depth
    #[inline]
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// With traversal counters on or off
    #[inline]
    #[must_use]
    pub fn with_collect_stats(mut self, collect_stats: bool) -> Self {
        self.collect_stats = collect_stats;
        self
    }

    /// Parse configuration from TOML text
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns [`ReplicaError::Config`] if the text is not valid TOML or holds
    /// unknown keys
    pub fn from_toml_str(text: &str) -> Result<Self, ReplicaError> {
        toml::from_str(text).map_err(|e| ReplicaError::Config(e.to_string()))
    }

    /// Render configuration as TOML text
    ///
    /// # Errors
    /// Returns [`ReplicaError::Config`] if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ReplicaError> {
        toml::to_string(self).map_err(|e| ReplicaError::Config(e.to_string()))
    }
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            collect_stats: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_methods() {
        let config = ReplicaConfig::new().with_max_depth(8).with_collect_stats(false);
        assert_eq!(config.max_depth, Some(8));
        assert!(!config.collect_stats);
        assert_eq!(config.unbounded().max_depth, None);
    }

    #[test]
    fn toml_defaults_fill_missing_keys() {
        let config = ReplicaConfig::from_toml_str("max_depth = 4").unwrap();
        assert_eq!(config, ReplicaConfig::new().with_max_depth(4));

        let empty = ReplicaConfig::from_toml_str("").unwrap();
        assert_eq!(empty, ReplicaConfig::default());
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = ReplicaConfig::from_toml_str("max_detph = 4").unwrap_err();
        assert!(matches!(err, ReplicaError::Config(_)));
    }

    #[test]
    fn toml_round_trip() {
        let config = ReplicaConfig::new().with_max_depth(16);
        let text = config.to_toml_string().unwrap();
        assert_eq!(ReplicaConfig::from_toml_str(&text).unwrap(), config);
    }
}
