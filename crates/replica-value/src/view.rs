//! Chained reads through a value graph
//!
//! [`ValueView`] carries the path walked so far, so a failed read reports
//! exactly where the graph stopped matching what the caller expected.

use crate::error::ValueError;
use crate::from_value::FromValue;
use crate::key::MapKey;
use crate::path::{FieldPath, Segment};
use crate::shape::Shape;
use crate::value::{lookup_rendered, mismatch, Value};

/// Cursor into a [`Value`]
///
/// Navigation never fails eagerly; the first error is kept and returned by
/// whichever terminal accessor is called.
///
/// # Example
/// ```rust,ignore
/// let name = replica.view().field("PropertyB").field("DictProp").key("key").field("Name").as_str()?;
/// ```
#[derive(Debug, Clone)]
pub struct ValueView<'a> {
    current: Result<&'a Value, ValueError>,
    path: FieldPath,
}

impl<'a> ValueView<'a> {
    /// View rooted at `value`
    #[inline]
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self {
            current: Ok(value),
            path: FieldPath::root(),
        }
    }

    fn step(self, segment: Segment) -> Self {
        let path = self.path.append(segment);
        let current = match self.current {
            Ok(value) => path
                .last()
                .map_or(Ok(value), |segment| value.step(segment, &path)),
            Err(err) => Err(err),
        };
        Self { current, path }
    }

    /// Record member
    #[must_use]
    pub fn field(self, name: &str) -> Self {
        self.step(Segment::member(name))
    }

    /// Sequence element
    #[must_use]
    pub fn index(self, position: usize) -> Self {
        self.step(Segment::index(position))
    }

    /// Map entry
    #[must_use]
    pub fn key(self, key: impl Into<MapKey>) -> Self {
        let key = key.into();
        let path = self.path.key(key.to_string());
        let current = match self.current {
            Ok(Value::Map(map)) => match map.get(&key) {
                Some(value) => Ok(value),
                None => lookup_rendered(map, &key.to_string(), &path),
            },
            Ok(other) => Err(mismatch(&path, "map", other)),
            Err(err) => Err(err),
        };
        Self { current, path }
    }

    /// Follow a canonical path string relative to this view
    #[must_use]
    pub fn at(self, path: &str) -> Self {
        match path.parse::<FieldPath>() {
            Ok(relative) => relative.iter().cloned().fold(self, Self::step),
            Err(err) => Self {
                current: Err(err.into()),
                path: self.path,
            },
        }
    }

    /// Path walked so far
    #[inline]
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Value at this position
    ///
    /// # Errors
    /// Returns the first navigation error
    pub fn value(self) -> Result<&'a Value, ValueError> {
        self.current
    }

    /// Shape at this position
    ///
    /// # Errors
    /// Returns the first navigation error
    pub fn shape(&self) -> Result<Shape, ValueError> {
        self.current.as_ref().map(|v| v.shape()).map_err(Clone::clone)
    }

    /// Check if this position exists
    #[inline]
    #[must_use]
    pub fn exists(&self) -> bool {
        self.current.is_ok()
    }

    fn scalar<T>(
        self,
        expected: &'static str,
        read: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, ValueError> {
        let value = self.current?;
        read(value).ok_or_else(|| mismatch(&self.path, expected, value))
    }

    /// # Errors
    /// Returns navigation error or [`ValueError::TypeMismatch`]
    pub fn as_str(self) -> Result<&'a str, ValueError> {
        self.scalar("string", Value::as_str)
    }

    /// # Errors
    /// Returns navigation error or [`ValueError::TypeMismatch`]
    pub fn as_i64(self) -> Result<i64, ValueError> {
        self.scalar("int", Value::as_i64)
    }

    /// # Errors
    /// Returns navigation error or [`ValueError::TypeMismatch`]
    pub fn as_u64(self) -> Result<u64, ValueError> {
        self.scalar("uint", Value::as_u64)
    }

    /// # Errors
    /// Returns navigation error or [`ValueError::TypeMismatch`]
    pub fn as_f64(self) -> Result<f64, ValueError> {
        self.scalar("float", Value::as_f64)
    }

    /// # Errors
    /// Returns navigation error or [`ValueError::TypeMismatch`]
    pub fn as_bool(self) -> Result<bool, ValueError> {
        self.scalar("bool", Value::as_bool)
    }

    /// Number of members, elements or entries
    ///
    /// # Errors
    /// Returns navigation error, or [`ValueError::TypeMismatch`] for scalars
    pub fn len(self) -> Result<usize, ValueError> {
        let value = self.current?;
        if value.shape().is_container() {
            Ok(value.len())
        } else {
            Err(mismatch(&self.path, "container", value))
        }
    }

    /// Materialize the value at this position as `T`
    ///
    /// # Errors
    /// Returns navigation error or the materialization error of `T`
    pub fn to<T: FromValue>(self) -> Result<T, ValueError> {
        let value = self.current?;
        T::from_value(value, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Value {
        Value::record([
            (
                "PropertyB",
                Value::record([
                    ("ArrayProp", Value::sequence(["arrayProp"])),
                    (
                        "DictProp",
                        Value::map([(
                            "key",
                            Value::record([("Id", Value::from(1)), ("Name", Value::from("name"))]),
                        )]),
                    ),
                ]),
            ),
            ("Scores", Value::map([(MapKey::Int(3), Value::from(9.5))])),
        ])
    }

    #[test]
    fn chained_reads() {
        let value = sample();
        let name = value
            .view()
            .field("PropertyB")
            .field("DictProp")
            .key("key")
            .field("Name")
            .as_str();
        assert_eq!(name, Ok("name"));
        assert_eq!(value.view().field("PropertyB").field("ArrayProp").index(0).as_str(), Ok("arrayProp"));
        assert_eq!(value.view().field("Scores").key(3_i64).as_f64(), Ok(9.5));
    }

    #[test]
    fn relative_paths() {
        let value = sample();
        let dict = value.view().field("PropertyB").at("DictProp[key]");
        assert_eq!(dict.path().to_string(), "PropertyB.DictProp[key]");
        assert_eq!(dict.field("Id").as_i64(), Ok(1));
    }

    #[test]
    fn first_error_wins() {
        let value = sample();
        let err = value
            .view()
            .field("Missing")
            .field("Deeper")
            .index(3)
            .as_str()
            .unwrap_err();
        assert_eq!(
            err,
            ValueError::MissingMember {
                path: "Missing".to_string()
            }
        );
    }

    #[test]
    fn scalar_kind_mismatch_names_path() {
        let value = sample();
        let err = value
            .view()
            .at("PropertyB.DictProp[key].Name")
            .as_i64()
            .unwrap_err();
        assert_eq!(
            err,
            ValueError::TypeMismatch {
                path: "PropertyB.DictProp[key].Name".to_string(),
                expected: "int",
                found: "string",
            }
        );
    }

    #[test]
    fn len_and_exists() {
        let value = sample();
        assert_eq!(value.view().field("PropertyB").len(), Ok(2));
        assert!(value.view().field("Scores").exists());
        assert!(!value.view().field("Nope").exists());
        assert!(value.view().at("PropertyB.ArrayProp[0]").len().is_err());
    }

    #[test]
    fn key_matches_other_integer_kinds() {
        let value = Value::map([(MapKey::UInt(7), "seven")]);
        assert_eq!(value.view().key(7).as_str(), Ok("seven"));
        assert_eq!(value.view().key("7").as_str(), Ok("seven"));
        assert_eq!(
            value.view().key(8).value().unwrap_err(),
            ValueError::MissingKey {
                path: "[8]".to_string(),
            }
        );
    }

    #[test]
    fn typed_read() {
        let value = sample();
        let tags: Vec<String> = value.view().at("PropertyB.ArrayProp").to().unwrap();
        assert_eq!(tags, vec!["arrayProp".to_string()]);
    }
}
