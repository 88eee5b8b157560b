//! Typed materialization
//!
//! [`FromValue`] rebuilds a concrete type from a replica. This is where an
//! override that substituted a value of the wrong kind is finally noticed:
//! the error names the path of the offending slot.

use crate::error::ValueError;
use crate::key::FromMapKey;
use crate::path::FieldPath;
use crate::value::{mismatch, Value};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};

/// Types that can be rebuilt from a [`Value`]
///
/// Derive it with `#[derive(FromValue)]`; member names follow the same
/// renaming rules as `#[derive(Reflect)]`.
pub trait FromValue: Sized {
    /// Rebuild from `value`, which sits at `path` in the enclosing graph
    ///
    /// # Errors
    /// Returns error if `value` does not have the kind `Self` needs
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError>;
}

/// Rebuild `T` from a root value
///
/// # Errors
/// Returns the first mismatch found, with its path
pub fn from_value<T: FromValue>(value: &Value) -> Result<T, ValueError> {
    T::from_value(value, &FieldPath::root())
}

impl FromValue for Value {
    fn from_value(value: &Value, _path: &FieldPath) -> Result<Self, ValueError> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        value.as_bool().ok_or_else(|| mismatch(path, "bool", value))
    }
}

impl FromValue for char {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        value.as_char().ok_or_else(|| mismatch(path, "char", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch(path, "string", value))
    }
}

macro_rules! integers {
    ($($t:ty),*) => {$(
        impl FromValue for $t {
            fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
                let out_of_range = || ValueError::OutOfRange {
                    path: path.to_string(),
                    type_name: stringify!($t),
                };
                match value {
                    Value::Int(i) => <$t>::try_from(*i).map_err(|_| out_of_range()),
                    Value::UInt(u) => <$t>::try_from(*u).map_err(|_| out_of_range()),
                    other => Err(mismatch(path, "int", other)),
                }
            }
        }
    )*};
}

integers!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        value.as_f64().ok_or_else(|| mismatch(path, "float", value))
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        value
            .as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| mismatch(path, "float", value))
    }
}

impl FromValue for () {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        if value.is_null() {
            Ok(())
        } else {
            Err(mismatch(path, "null", value))
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value, path).map(Some)
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        T::from_value(value, path).map(Box::new)
    }
}

fn elements<'v>(value: &'v Value, path: &FieldPath) -> Result<&'v [Value], ValueError> {
    value
        .as_sequence()
        .ok_or_else(|| mismatch(path, "sequence", value))
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        elements(value, path)?
            .iter()
            .enumerate()
            .map(|(position, item)| T::from_value(item, &path.index(position)))
            .collect()
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        Vec::from_value(value, path).map(VecDeque::from)
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        let items: Vec<T> = Vec::from_value(value, path)?;
        let len = items.len();
        items.try_into().map_err(|_| ValueError::IndexOutOfBounds {
            path: path.to_string(),
            index: N,
            len,
        })
    }
}

fn entries<K, V, C>(value: &Value, path: &FieldPath) -> Result<C, ValueError>
where
    K: FromMapKey,
    V: FromValue,
    C: FromIterator<(K, V)>,
{
    let map = value.as_map().ok_or_else(|| mismatch(path, "map", value))?;
    map.iter()
        .map(|(key, entry)| -> Result<(K, V), ValueError> {
            let child = path.key(key.to_string());
            Ok((K::from_map_key(key, &child)?, V::from_value(entry, &child)?))
        })
        .collect()
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: FromMapKey + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        entries(value, path)
    }
}

impl<K: FromMapKey + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        entries(value, path)
    }
}

impl<K, V, S> FromValue for IndexMap<K, V, S>
where
    K: FromMapKey + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: &Value, path: &FieldPath) -> Result<Self, ValueError> {
        entries(value, path)
    }
}
