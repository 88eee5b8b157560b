//! Owned value graph
//!
//! [`Value`] is the tagged-variant form every replica is built from. Records
//! and maps keep insertion order, so a replica lists members in the same order
//! as the original declared them.

use crate::error::ValueError;
use crate::key::MapKey;
use crate::path::{FieldPath, Segment};
use crate::shape::Shape;
use crate::view::ValueView;
use indexmap::IndexMap;
use std::ops::Index;

/// Ordered record members
pub type Record = IndexMap<String, Value>;

/// Ordered map entries
pub type Map = IndexMap<MapKey, Value>;

static NULL: Value = Value::Null;

/// Node of a replica graph
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point number
    Float(f64),
    /// Character
    Char(char),
    /// String (atomic, never traversed per character)
    String(String),
    /// Named members in declaration order
    Record(Record),
    /// Ordered elements
    Sequence(Vec<Value>),
    /// Keyed entries
    Map(Map),
}

impl Value {
    /// Build a record from `(name, value)` pairs
    #[must_use]
    pub fn record<I, K, V>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Record(
            members
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a map from `(key, value)` pairs
    #[must_use]
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<MapKey>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence
    #[must_use]
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Shape of this value
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Null => Shape::Null,
            Self::Bool(_)
            | Self::Int(_)
            | Self::UInt(_)
            | Self::Float(_)
            | Self::Char(_)
            | Self::String(_) => Shape::Scalar,
            Self::Record(_) => Shape::Record,
            Self::Sequence(_) => Shape::Sequence,
            Self::Map(_) => Shape::Map,
        }
    }

    /// Kind name used in error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Record(_) => "record",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Signed integer view (unsigned values that fit are included)
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Unsigned integer view (non-negative signed values are included)
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(u) => Some(*u),
            Self::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Float view (integers are widened)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            Self::UInt(u) => Some(*u as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Number of members, elements or entries (0 for scalars and null)
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Record(r) => r.len(),
            Self::Sequence(s) => s.len(),
            Self::Map(m) => m.len(),
            _ => 0,
        }
    }

    /// Check if container is empty (always true for scalars and null)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record member, or string-keyed map entry
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Record(r) => r.get(name),
            Self::Map(m) => m.get(&MapKey::String(name.to_string())),
            _ => None,
        }
    }

    /// Sequence element
    #[must_use]
    pub fn get_index(&self, position: usize) -> Option<&Value> {
        self.as_sequence().and_then(|s| s.get(position))
    }

    /// Map entry by typed key
    #[must_use]
    pub fn get_key(&self, key: &MapKey) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Resolve a canonical path string such as `PropertyB.ListProp[0]`
    ///
    /// # Errors
    /// Returns error if the text is not a valid path or a segment does not
    /// match the value found at that point
    pub fn get_path(&self, path: &str) -> Result<&Value, ValueError> {
        let path: FieldPath = path.parse()?;
        self.resolve(&path)
    }

    /// Resolve a parsed path
    ///
    /// # Errors
    /// Returns error naming the first segment that does not match
    pub fn resolve(&self, path: &FieldPath) -> Result<&Value, ValueError> {
        let mut current = self;
        let mut walked = FieldPath::root();
        for segment in path.iter() {
            walked = walked.append(segment.clone());
            current = current.step(segment, &walked)?;
        }
        Ok(current)
    }

    /// Follow one segment; `path` already includes `segment`
    pub(crate) fn step(&self, segment: &Segment, path: &FieldPath) -> Result<&Value, ValueError> {
        match (segment, self) {
            (Segment::Member(name), Self::Record(record)) => {
                record
                    .get(name.as_str())
                    .ok_or_else(|| ValueError::MissingMember {
                        path: path.to_string(),
                    })
            }
            (Segment::Member(_), other) => Err(mismatch(path, "record", other)),
            (Segment::Index(position), Self::Sequence(items)) => {
                items
                    .get(*position)
                    .ok_or_else(|| ValueError::IndexOutOfBounds {
                        path: path.to_string(),
                        index: *position,
                        len: items.len(),
                    })
            }
            (Segment::Index(position), Self::Map(map)) => {
                lookup_rendered(map, &position.to_string(), path)
            }
            (Segment::Index(_), other) => Err(mismatch(path, "sequence", other)),
            (Segment::Key(rendered), Self::Map(map)) => lookup_rendered(map, rendered, path),
            (Segment::Key(_), other) => Err(mismatch(path, "map", other)),
        }
    }

    /// Chained, error-reporting reader rooted at this value
    #[inline]
    #[must_use]
    pub fn view(&self) -> ValueView<'_> {
        ValueView::new(self)
    }
}

/// Map lookup by rendered key
///
/// String keys are tried directly before falling back to comparing renderings.
pub(crate) fn lookup_rendered<'v>(map: &'v Map, rendered: &str, path: &FieldPath) -> Result<&'v Value, ValueError> {
    map.get(&MapKey::String(rendered.to_string()))
        .or_else(|| {
            map.iter()
                .find(|(key, _)| key.to_string() == rendered)
                .map(|(_, value)| value)
        })
        .ok_or_else(|| ValueError::MissingKey {
            path: path.to_string(),
        })
}

pub(crate) fn mismatch(path: &FieldPath, expected: &'static str, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: found.kind(),
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Missing members read as [`Value::Null`]
    fn index(&self, name: &str) -> &Value {
        self.get(name).unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Out-of-range positions read as [`Value::Null`]
    fn index(&self, position: usize) -> &Value {
        self.get_index(position).unwrap_or(&NULL)
    }
}

impl Index<&MapKey> for Value {
    type Output = Value;

    fn index(&self, key: &MapKey) -> &Value {
        self.get_key(key).unwrap_or(&NULL)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::Int(i64::from(v))
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::UInt(u64::from(v))
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::UInt(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::sequence(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}
