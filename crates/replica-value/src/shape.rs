//! Node classification
//!
//! Decides which of the five shapes a value has, which in turn decides how the
//! traversal engine handles it.

use crate::error::ValueError;
use crate::reflect::{Node, Reflect};
use std::fmt::{self, Display, Formatter};

/// Shape of a node in a value graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Absent value
    Null,
    /// Atomic value: strings, numbers, booleans, characters
    Scalar,
    /// Named-field structure
    Record,
    /// Ordered, integer-indexed collection
    Sequence,
    /// Keyed collection over a finite key set
    Map,
}

impl Shape {
    /// Check if the shape has children to descend into
    #[inline]
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Record | Self::Sequence | Self::Map)
    }

    /// Lowercase shape name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar => "scalar",
            Self::Record => "record",
            Self::Sequence => "sequence",
            Self::Map => "map",
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a value through its field enumerator
///
/// Priority follows the enumerator's answer: null, then scalar (strings
/// included), then sequence, map and record. The replication engine
/// dispatches on the same [`Node`] variants directly, so a slot is walked as
/// the shape returned here.
///
/// # Errors
/// Returns [`ValueError::UnsupportedShape`] if the type reports itself opaque
pub fn classify(value: &dyn Reflect) -> Result<Shape, ValueError> {
    match value.reflect() {
        Node::Opaque(type_name) => Err(ValueError::UnsupportedShape {
            path: String::new(),
            type_name,
        }),
        node => Ok(node.shape().unwrap_or(Shape::Null)),
    }
}
