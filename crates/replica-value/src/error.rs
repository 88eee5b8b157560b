//! Error types for value access and enumeration
//!
//! Covers:
//! - Types the field enumerator cannot describe
//! - Reads through a replica that do not match its shape
//! - Typed materialization failures

use crate::path::PathError;

/// Errors from enumerating, navigating or materializing values
///
/// Every variant carries the rendered path of the failing location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// Type exposes no members the enumerator can walk
    #[error("unsupported shape at '{path}': {type_name} is opaque")]
    UnsupportedShape {
        path: String,
        type_name: &'static str,
    },

    /// Record has no member with the requested name
    #[error("missing member at '{path}'")]
    MissingMember { path: String },

    /// Map has no entry for the requested key
    #[error("missing key at '{path}'")]
    MissingKey { path: String },

    /// Sequence is shorter than the requested position
    #[error("index {index} out of bounds at '{path}' (len {len})")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    /// Value kind differs from what the reader expects
    ///
    /// This is how an override policy that returned an incompatible value
    /// surfaces: at the point of use, not during traversal.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Numeric value does not fit the target type
    #[error("value at '{path}' out of range for {type_name}")]
    OutOfRange {
        path: String,
        type_name: &'static str,
    },

    /// String does not name a variant of the target enum
    #[error("unknown variant '{variant}' at '{path}'")]
    UnknownVariant { path: String, variant: String },

    /// Path text could not be parsed
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// Failure reported by a custom `FromValue` implementation
    #[error("{0}")]
    Custom(String),
}

impl ValueError {
    /// Rendered path of the failing location (if any)
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::UnsupportedShape { path, .. }
            | Self::MissingMember { path }
            | Self::MissingKey { path }
            | Self::IndexOutOfBounds { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::OutOfRange { path, .. }
            | Self::UnknownVariant { path, .. } => Some(path),
            Self::InvalidPath(_) | Self::Custom(_) => None,
        }
    }

    /// Check if error is a shape mismatch at the point of use
    #[inline]
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. } | Self::OutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_path() {
        let err = ValueError::TypeMismatch {
            path: "PropertyC.Id".to_string(),
            expected: "int",
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "type mismatch at 'PropertyC.Id': expected int, found string"
        );
        assert_eq!(err.path(), Some("PropertyC.Id"));
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn path_errors_convert() {
        let err: ValueError = PathError::EmptySegment.into();
        assert!(err.path().is_none());
        assert!(err.to_string().contains("empty segment"));
    }
}
