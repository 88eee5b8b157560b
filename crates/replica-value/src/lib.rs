//! Replica Value Model
//!
//! Owned value graphs, canonical field paths and the field enumerator the
//! replication engine walks.
//!
//! # Core Concepts
//!
//! - [`Reflect`]: Field enumerator exposing a value's shape and children
//! - [`Value`]: Owned tagged-variant node of a replica graph
//! - [`FieldPath`]: Canonical location such as `PropertyB.DictProp[key].Name`
//! - [`Shape`]: Null, scalar, record, sequence or map
//! - [`ValueView`]: Chained reads that report the failing path
//! - [`FromValue`]: Typed materialization of a replica
//!
//! # Example
//!
//! ```rust,ignore
//! use replica_value::{FromValue, Reflect, Value};
//!
//! #[derive(Reflect, FromValue)]
//! #[replica(rename_all = "PascalCase")]
//! struct Item {
//!     id: i32,
//!     name: String,
//! }
//!
//! let value = Value::from_reflect(&Item { id: 1, name: "a".into() })?;
//! assert_eq!(value.get_path("Name")?, "a");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

extern crate self as replica_value;

// Core modules
mod error;
mod from_value;
mod key;
mod path;
mod reflect;
mod shape;
mod value;
mod view;

// Re-exports
pub use error::ValueError;
pub use from_value::{from_value, FromValue};
pub use key::{FromMapKey, MapKey, ReflectKey};
pub use path::{FieldPath, PathError, Segment};
pub use reflect::{snapshot, Node, Opaque, Reflect, Scalar};
pub use shape::{classify, Shape};
pub use value::{Map, Record, Value};
pub use view::ValueView;

#[cfg(feature = "derive")]
pub use replica_derive::{FromValue, Reflect};

/// Support code for derived implementations
/// **Note:** Generated code depends on this; it is not a stable API.
#[doc(hidden)]
pub mod __private {
    use super::{FieldPath, Record, Value, ValueError};

    /// Members of a record, or a mismatch naming `path`
    ///
    /// # Errors
    /// Returns [`ValueError::TypeMismatch`] if `value` is not a record
    pub fn expect_record<'v>(value: &'v Value, path: &FieldPath) -> Result<&'v Record, ValueError> {
        value
            .as_record()
            .ok_or_else(|| crate::value::mismatch(path, "record", value))
    }

    /// Required member of a record
    ///
    /// # Errors
    /// Returns [`ValueError::MissingMember`] if `name` is absent
    pub fn member<'v>(record: &'v Record, name: &str, path: &FieldPath) -> Result<&'v Value, ValueError> {
        record.get(name).ok_or_else(|| ValueError::MissingMember {
            path: path.to_string(),
        })
    }

    /// Unit variant name from a string value
    ///
    /// # Errors
    /// Returns [`ValueError::TypeMismatch`] if `value` is not a string
    pub fn expect_variant<'v>(value: &'v Value, path: &FieldPath) -> Result<&'v str, ValueError> {
        value
            .as_str()
            .ok_or_else(|| crate::value::mismatch(path, "string", value))
    }

    /// Error for a string that names no variant
    #[must_use]
    pub fn unknown_variant(variant: &str, path: &FieldPath) -> ValueError {
        ValueError::UnknownVariant {
            path: path.to_string(),
            variant: variant.to_string(),
        }
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
