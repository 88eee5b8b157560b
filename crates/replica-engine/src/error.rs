//! Error types for the replication engine
//!
//! Provides error handling for:
//! - Opaque values reached during traversal
//! - Shallow replicas of non-record roots
//! - Runaway traversal depth
//! - Invalid configuration

use replica_value::{Shape, ValueError};

/// Main replication error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReplicaError {
    /// Enumeration, navigation or materialization failed
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Shallow mode requires a record root
    #[error("shallow replica requires a record root, found {found}")]
    NotARecord { found: Shape },

    /// Traversal went deeper than the configured limit
    #[error("depth limit {limit} exceeded at '{path}'")]
    DepthLimitExceeded { path: String, limit: usize },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl ReplicaError {
    /// Check if error comes from a policy replacement of the wrong kind
    #[inline]
    #[must_use]
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Self::Value(err) if err.is_type_mismatch())
    }

    /// Rendered path of the failing location (if any)
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Value(err) => err.path(),
            Self::DepthLimitExceeded { path, .. } => Some(path),
            Self::NotARecord { .. } | Self::Config(_) => None,
        }
    }
}
