//! Field enumeration
//!
//! [`Reflect`] is the capability the traversal engine consumes: for any value
//! it reports a [`Node`] naming the value's shape and borrowing its children.
//! Implementations exist for std scalars and collections, smart pointers,
//! `serde_json::Value` and [`Value`]; user types get one from
//! `#[derive(Reflect)]`.
//!
//! # Ordering
//! - Records: declaration order
//! - Sequences: element order
//! - Hash maps: sorted by [`MapKey`], so a traversal is stable across runs
//! - Ordered maps (`BTreeMap`, `IndexMap`): their own iteration order

use crate::error::ValueError;
use crate::key::{MapKey, ReflectKey};
use crate::path::FieldPath;
use crate::shape::Shape;
use crate::value::Value;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::{self, Debug, Formatter};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

/// Field enumerator
///
/// # Contract
/// - `reflect` must not mutate anything reachable from `self`
/// - Children must be reported in a stable order (see module docs)
/// - Types without accessible members report [`Node::Opaque`]
pub trait Reflect {
    /// Describe this value and borrow its children
    fn reflect(&self) -> Node<'_>;
}

/// Atomic value borrowed from the original graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
}

impl Scalar<'_> {
    /// Copy into an owned [`Value`]
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b),
            Self::Int(i) => Value::Int(i),
            Self::UInt(u) => Value::UInt(u),
            Self::Float(f) => Value::Float(f),
            Self::Char(c) => Value::Char(c),
            Self::Str(s) => Value::String(s.to_string()),
        }
    }

    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(i),
            Self::UInt(u) => i64::try_from(u).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u64(self) -> Option<u64> {
        match self {
            Self::UInt(u) => Some(u),
            Self::Int(i) => u64::try_from(i).ok(),
            _ => None,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(f),
            Self::Int(i) => Some(i as f64),
            Self::UInt(u) => Some(u as f64),
            _ => None,
        }
    }
}

/// One step of field enumeration
pub enum Node<'a> {
    /// Absent value
    Null,
    /// Atomic value
    Scalar(Scalar<'a>),
    /// Named members in declaration order
    Record(Vec<(&'a str, &'a dyn Reflect)>),
    /// Elements in order
    Sequence(Vec<&'a dyn Reflect>),
    /// Entries with owned keys
    Map(Vec<(MapKey, &'a dyn Reflect)>),
    /// Type with no accessible members
    Opaque(&'static str),
}

impl Node<'_> {
    /// Shape of this node (`None` for opaque types)
    #[must_use]
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Self::Null => Some(Shape::Null),
            Self::Scalar(_) => Some(Shape::Scalar),
            Self::Record(_) => Some(Shape::Record),
            Self::Sequence(_) => Some(Shape::Sequence),
            Self::Map(_) => Some(Shape::Map),
            Self::Opaque(_) => None,
        }
    }
}

impl Debug for Node<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Self::Record(fields) => f
                .debug_struct("Record")
                .field("members", &fields.iter().map(|(n, _)| *n).collect::<Vec<_>>())
                .finish(),
            Self::Sequence(items) => f.debug_struct("Sequence").field("len", &items.len()).finish(),
            Self::Map(entries) => f
                .debug_struct("Map")
                .field("keys", &entries.iter().map(|(k, _)| k).collect::<Vec<_>>())
                .finish(),
            Self::Opaque(type_name) => f.debug_tuple("Opaque").field(type_name).finish(),
        }
    }
}

/// Read helpers for policies inspecting an original value
impl<'a> dyn Reflect + 'a {
    /// Shape of this value (`None` for opaque types)
    #[must_use]
    pub fn shape(&self) -> Option<Shape> {
        self.reflect().shape()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.reflect(), Node::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.reflect() {
            Node::Scalar(Scalar::Bool(b)) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.reflect() {
            Node::Scalar(s) => s.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self.reflect() {
            Node::Scalar(s) => s.as_u64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.reflect() {
            Node::Scalar(s) => s.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self.reflect() {
            Node::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Owned copy of this value and everything beneath it
    ///
    /// # Errors
    /// Returns error if an opaque type is reachable
    pub fn to_value(&self) -> Result<Value, ValueError> {
        snapshot(self, &FieldPath::root())
    }
}

impl Value {
    /// Owned copy of any reflected value
    ///
    /// # Errors
    /// Returns error if an opaque type is reachable
    pub fn from_reflect(value: &dyn Reflect) -> Result<Self, ValueError> {
        snapshot(value, &FieldPath::root())
    }
}

/// Copy `value` into an owned [`Value`] without consulting any policy
///
/// `path` is the location of `value`; errors report paths beneath it.
///
/// # Errors
/// Returns [`ValueError::UnsupportedShape`] for the first opaque node found
pub fn snapshot(value: &dyn Reflect, path: &FieldPath) -> Result<Value, ValueError> {
    match value.reflect() {
        Node::Null => Ok(Value::Null),
        Node::Scalar(s) => Ok(s.to_value()),
        Node::Record(fields) => fields
            .into_iter()
            .map(|(name, field)| -> Result<_, ValueError> {
                Ok((name.to_string(), snapshot(field, &path.member(name))?))
            })
            .collect::<Result<IndexMap<_, _>, ValueError>>()
            .map(Value::Record),
        Node::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(position, item)| snapshot(item, &path.index(position)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        Node::Map(entries) => entries
            .into_iter()
            .map(|(key, entry)| -> Result<_, ValueError> {
                let child = path.key(key.to_string());
                Ok((key, snapshot(entry, &child)?))
            })
            .collect::<Result<IndexMap<_, _>, ValueError>>()
            .map(Value::Map),
        Node::Opaque(type_name) => Err(ValueError::UnsupportedShape {
            path: path.to_string(),
            type_name,
        }),
    }
}

/// Wrapper marking a value the enumerator must not look into
///
/// Traversal fails with [`ValueError::UnsupportedShape`] at an `Opaque`
/// slot unless an override policy replaces it first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Opaque<T>(pub T);

impl<T> Opaque<T> {
    #[inline]
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Reflect for Opaque<T> {
    fn reflect(&self) -> Node<'_> {
        Node::Opaque(std::any::type_name::<T>())
    }
}

// ============================================================================
// Scalars
// ============================================================================

macro_rules! reflect_scalar {
    ($variant:ident, $wide:ty => $($t:ty),*) => {$(
        impl Reflect for $t {
            fn reflect(&self) -> Node<'_> {
                Node::Scalar(Scalar::$variant(<$wide>::from(*self)))
            }
        }
    )*};
}

reflect_scalar!(Int, i64 => i8, i16, i32, i64);
reflect_scalar!(UInt, u64 => u8, u16, u32, u64);
reflect_scalar!(Float, f64 => f32, f64);
reflect_scalar!(Bool, bool => bool);
reflect_scalar!(Char, char => char);

impl Reflect for isize {
    fn reflect(&self) -> Node<'_> {
        Node::Scalar(Scalar::Int(*self as i64))
    }
}

impl Reflect for usize {
    fn reflect(&self) -> Node<'_> {
        Node::Scalar(Scalar::UInt(*self as u64))
    }
}

impl Reflect for str {
    fn reflect(&self) -> Node<'_> {
        Node::Scalar(Scalar::Str(self))
    }
}

impl Reflect for String {
    fn reflect(&self) -> Node<'_> {
        Node::Scalar(Scalar::Str(self))
    }
}

impl Reflect for Cow<'_, str> {
    fn reflect(&self) -> Node<'_> {
        Node::Scalar(Scalar::Str(self))
    }
}

impl Reflect for () {
    fn reflect(&self) -> Node<'_> {
        Node::Null
    }
}

// ============================================================================
// Wrappers
// ============================================================================

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Node<'_> {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn reflect(&self) -> Node<'_> {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Rc<T> {
    fn reflect(&self) -> Node<'_> {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Arc<T> {
    fn reflect(&self) -> Node<'_> {
        (**self).reflect()
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Node<'_> {
        match self {
            Some(inner) => inner.reflect(),
            None => Node::Null,
        }
    }
}

// ============================================================================
// Sequences
// ============================================================================

fn sequence<'a, T: Reflect + 'a>(items: impl Iterator<Item = &'a T>) -> Node<'a> {
    Node::Sequence(items.map(|item| item as &dyn Reflect).collect())
}

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Node<'_> {
        sequence(self.iter())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Node<'_> {
        sequence(self.iter())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Node<'_> {
        sequence(self.iter())
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn reflect(&self) -> Node<'_> {
        sequence(self.iter())
    }
}

// ============================================================================
// Maps
// ============================================================================

/// Keys of one map must render distinctly; `Int(1)`, `UInt(1)` and
/// `String("1")` side by side are a caller error since they share the path `[1]`.
fn entries<'a, K, V>(pairs: impl Iterator<Item = (&'a K, &'a V)>) -> Vec<(MapKey, &'a dyn Reflect)>
where
    K: ReflectKey + 'a + ?Sized,
    V: Reflect + 'a,
{
    let pairs: Vec<(MapKey, &'a dyn Reflect)> = pairs
        .map(|(key, value)| (key.map_key(), value as &dyn Reflect))
        .collect();
    debug_assert!(
        distinct_renderings(&pairs),
        "map keys with equal renderings share one path"
    );
    pairs
}

fn distinct_renderings(pairs: &[(MapKey, &dyn Reflect)]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(pairs.len());
    pairs.iter().all(|(key, _)| seen.insert(key.to_string()))
}

impl<K: ReflectKey, V: Reflect, S: BuildHasher> Reflect for HashMap<K, V, S> {
    fn reflect(&self) -> Node<'_> {
        let mut pairs = entries(self.iter());
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Node::Map(pairs)
    }
}

impl<K: ReflectKey, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect(&self) -> Node<'_> {
        Node::Map(entries(self.iter()))
    }
}

impl<K: ReflectKey, V: Reflect, S: BuildHasher> Reflect for IndexMap<K, V, S> {
    fn reflect(&self) -> Node<'_> {
        Node::Map(entries(self.iter()))
    }
}

// ============================================================================
// Dynamic values
// ============================================================================

impl Reflect for Value {
    fn reflect(&self) -> Node<'_> {
        match self {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
            Value::Int(i) => Node::Scalar(Scalar::Int(*i)),
            Value::UInt(u) => Node::Scalar(Scalar::UInt(*u)),
            Value::Float(f) => Node::Scalar(Scalar::Float(*f)),
            Value::Char(c) => Node::Scalar(Scalar::Char(*c)),
            Value::String(s) => Node::Scalar(Scalar::Str(s)),
            Value::Record(record) => Node::Record(
                record
                    .iter()
                    .map(|(name, member)| (name.as_str(), member as &dyn Reflect))
                    .collect(),
            ),
            Value::Sequence(items) => sequence(items.iter()),
            Value::Map(map) => Node::Map(entries(map.iter())),
        }
    }
}

/// JSON objects are records: their members render as `a.b`, not `a[b]`
impl Reflect for serde_json::Value {
    fn reflect(&self) -> Node<'_> {
        use serde_json::Value as Json;
        match self {
            Json::Null => Node::Null,
            Json::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Node::Scalar(Scalar::UInt(u))
                } else {
                    Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Json::String(s) => Node::Scalar(Scalar::Str(s)),
            Json::Array(items) => sequence(items.iter()),
            Json::Object(members) => Node::Record(
                members
                    .iter()
                    .map(|(name, member)| (name.as_str(), member as &dyn Reflect))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hash_maps_enumerate_sorted() {
        let map = HashMap::from([("b", 2), ("a", 1), ("c", 3)]);
        let Node::Map(pairs) = map.reflect() else {
            panic!("expected map");
        };
        let keys: Vec<_> = pairs.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "map keys with equal renderings")]
    fn keys_sharing_a_rendering_are_rejected() {
        let map = Value::map([(MapKey::Int(1), "int"), (MapKey::String("1".into()), "text")]);
        let _ = map.reflect();
    }

    #[test]
    fn snapshot_copies_nested_collections() {
        let data: BTreeMap<String, Vec<Option<u8>>> =
            BTreeMap::from([("xs".to_string(), vec![Some(1), None])]);
        let value = Value::from_reflect(&data).unwrap();
        assert_eq!(
            value,
            Value::map([("xs", Value::sequence([Value::UInt(1), Value::Null]))])
        );
    }

    #[test]
    fn snapshot_reports_opaque_path() {
        let data = vec![Opaque::new(1_u8)];
        let err = Value::from_reflect(&data).unwrap_err();
        assert_eq!(
            err,
            ValueError::UnsupportedShape {
                path: "[0]".to_string(),
                type_name: "u8",
            }
        );
    }

    #[test]
    fn value_reflects_itself() {
        let value = Value::record([("a", Value::sequence([1, 2])), ("b", Value::from("x"))]);
        assert_eq!(Value::from_reflect(&value).unwrap(), value);
    }

    #[test]
    fn json_objects_are_records() {
        let json = serde_json::json!({"name": "n", "tags": ["t"], "n": 1.5});
        let value = Value::from_reflect(&json).unwrap();
        assert_eq!(value["name"], "n");
        assert_eq!(value["tags"][0], "t");
        assert_eq!(value["n"].as_f64(), Some(1.5));
        assert_eq!(value.shape(), Shape::Record);
    }

    #[test]
    fn dyn_helpers_read_scalars() {
        let age = 30_i32;
        let name = String::from("John");
        let original: &dyn Reflect = &age;
        assert_eq!(original.as_i64(), Some(30));
        assert_eq!(original.as_str(), None);
        let original: &dyn Reflect = &name;
        assert_eq!(original.as_str(), Some("John"));
        assert_eq!(original.to_value().unwrap(), Value::from("John"));
    }
}
