//! Replica Engine
//!
//! Builds copies of arbitrary object graphs in which selected fields are
//! replaced by a caller-supplied override policy keyed by canonical field
//! path.
//!
//! # Core Concepts
//!
//! - [`OverridePolicy`]: Decides, per path, whether a slot takes a replacement
//! - [`Replicator`]: Configurable entry point for deep and shallow replicas
//! - [`Replica`]: Output graph, readable through the original's shape
//! - [`ReplicaConfig`]: Depth limit and stats collection
//!
//! # Example
//!
//! ```rust,ignore
//! use replica_engine::prelude::*;
//!
//! let policy = PathOverrides::new()
//!     .with("PropertyB.DictProp[key].Name", "modifiedName")
//!     .with("PropertyC.Id", 2);
//! let replica = deep_clone_with_modifier(&envelope, &policy)?;
//!
//! assert_eq!(replica.get_path("PropertyC.Id")?, 2);
//! let typed: Envelope = replica.materialize()?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod config;
mod engine;
mod error;
mod policy;
mod replica;

// Re-exports
pub use config::ReplicaConfig;
pub use engine::{
    deep_clone_with_modifier, shallow_clone_with_modifier, Mode, Replicator, TraversalStats,
};
pub use error::ReplicaError;
pub use policy::{from_fn, FnPolicy, NoOverride, Or, OverridePolicy, OverridePolicyExt, PathOverrides};
pub use replica::Replica;

/// Value model re-exported for convenience
pub use replica_value as value;

/// Common imports
pub mod prelude {
    pub use crate::{
        deep_clone_with_modifier, from_fn, shallow_clone_with_modifier, Mode, NoOverride,
        OverridePolicy, OverridePolicyExt, PathOverrides, Replica, ReplicaConfig, ReplicaError,
        Replicator,
    };
    pub use replica_value::{FieldPath, FromValue, MapKey, Reflect, Shape, Value, ValueError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
