//! Map keys
//!
//! [`MapKey`] is the owned key of a [`Value::Map`](crate::Value::Map). Keys
//! render to text for path segments, e.g. `DictProp[key]` or `Scores[7]`.

use crate::error::ValueError;
use crate::path::FieldPath;
use std::fmt::{self, Display, Formatter};

/// Key of a keyed map
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    /// Boolean key
    Bool(bool),
    /// Signed integer key
    Int(i64),
    /// Unsigned integer key
    UInt(u64),
    /// Character key
    Char(char),
    /// String key
    String(String),
}

impl MapKey {
    /// String content (for string keys)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Kind name used in error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Char(_) => "char",
            Self::String(_) => "string",
        }
    }
}

impl Display for MapKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for MapKey {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<char> for MapKey {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// Types usable as keys of a reflected map
///
/// Implemented for strings, integers, `bool` and `char`.
pub trait ReflectKey {
    /// Owned key for this value
    fn map_key(&self) -> MapKey;
}

/// Types that can be rebuilt from a [`MapKey`]
pub trait FromMapKey: Sized {
    /// Convert key, reporting failures against `path`
    ///
    /// # Errors
    /// Returns error if the key kind or range does not fit `Self`
    fn from_map_key(key: &MapKey, path: &FieldPath) -> Result<Self, ValueError>;
}

impl ReflectKey for MapKey {
    fn map_key(&self) -> MapKey {
        self.clone()
    }
}

impl FromMapKey for MapKey {
    fn from_map_key(key: &MapKey, _path: &FieldPath) -> Result<Self, ValueError> {
        Ok(key.clone())
    }
}

impl ReflectKey for String {
    fn map_key(&self) -> MapKey {
        MapKey::String(self.clone())
    }
}

impl ReflectKey for str {
    fn map_key(&self) -> MapKey {
        MapKey::String(self.to_string())
    }
}

impl<T: ReflectKey + ?Sized> ReflectKey for &T {
    fn map_key(&self) -> MapKey {
        (**self).map_key()
    }
}

impl FromMapKey for String {
    fn from_map_key(key: &MapKey, path: &FieldPath) -> Result<Self, ValueError> {
        match key {
            MapKey::String(s) => Ok(s.clone()),
            other => Err(ValueError::TypeMismatch {
                path: path.to_string(),
                expected: "string key",
                found: other.kind(),
            }),
        }
    }
}

impl ReflectKey for bool {
    fn map_key(&self) -> MapKey {
        MapKey::Bool(*self)
    }
}

impl FromMapKey for bool {
    fn from_map_key(key: &MapKey, path: &FieldPath) -> Result<Self, ValueError> {
        match key {
            MapKey::Bool(b) => Ok(*b),
            other => Err(ValueError::TypeMismatch {
                path: path.to_string(),
                expected: "bool key",
                found: other.kind(),
            }),
        }
    }
}

impl ReflectKey for char {
    fn map_key(&self) -> MapKey {
        MapKey::Char(*self)
    }
}

impl FromMapKey for char {
    fn from_map_key(key: &MapKey, path: &FieldPath) -> Result<Self, ValueError> {
        match key {
            MapKey::Char(c) => Ok(*c),
            other => Err(ValueError::TypeMismatch {
                path: path.to_string(),
                expected: "char key",
                found: other.kind(),
            }),
        }
    }
}

macro_rules! integer_keys {
    ($variant:ident, $wide:ty => $($t:ty),*) => {$(
        impl ReflectKey for $t {
            fn map_key(&self) -> MapKey {
                MapKey::$variant(<$wide>::try_from(*self).unwrap_or(<$wide>::MAX))
            }
        }

        impl FromMapKey for $t {
            fn from_map_key(key: &MapKey, path: &FieldPath) -> Result<Self, ValueError> {
                let out_of_range = || ValueError::OutOfRange {
                    path: path.to_string(),
                    type_name: stringify!($t),
                };
                match key {
                    MapKey::Int(i) => <$t>::try_from(*i).map_err(|_| out_of_range()),
                    MapKey::UInt(u) => <$t>::try_from(*u).map_err(|_| out_of_range()),
                    other => Err(ValueError::TypeMismatch {
                        path: path.to_string(),
                        expected: "integer key",
                        found: other.kind(),
                    }),
                }
            }
        }
    )*};
}

integer_keys!(Int, i64 => i8, i16, i32, i64, isize);
integer_keys!(UInt, u64 => u8, u16, u32, u64, usize);

impl From<i64> for MapKey {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for MapKey {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u64> for MapKey {
    fn from(u: u64) -> Self {
        Self::UInt(u)
    }
}

impl From<u32> for MapKey {
    fn from(u: u32) -> Self {
        Self::UInt(u64::from(u))
    }
}
