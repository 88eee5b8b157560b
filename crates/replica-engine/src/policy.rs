//! Override policies
//!
//! A policy decides, for one path at a time, whether the replica takes a
//! replacement value instead of the original. The engine asks each path at
//! most once, and a replacement is used as-is: it is not type checked and not
//! descended into.

use indexmap::IndexMap;
use replica_value::{Reflect, Value};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Caller-supplied replacement rule keyed by canonical field path
///
/// # Contract
/// - `None` means not handled; `Some(Value::Null)` replaces with null
/// - Must not depend on traversal order
/// - `original` is the value at `path` in the source graph and may be used to
///   derive the replacement
pub trait OverridePolicy: Send + Sync {
    /// Replacement for the value at `path`, if this policy handles it
    fn try_override(&self, path: &str, original: &dyn Reflect) -> Option<Value>;
}

impl<P: OverridePolicy + ?Sized> OverridePolicy for &P {
    fn try_override(&self, path: &str, original: &dyn Reflect) -> Option<Value> {
        (**self).try_override(path, original)
    }
}

impl<P: OverridePolicy + ?Sized> OverridePolicy for Box<P> {
    fn try_override(&self, path: &str, original: &dyn Reflect) -> Option<Value> {
        (**self).try_override(path, original)
    }
}

impl<P: OverridePolicy + ?Sized> OverridePolicy for Arc<P> {
    fn try_override(&self, path: &str, original: &dyn Reflect) -> Option<Value> {
        (**self).try_override(path, original)
    }
}

/// Policy that never handles a path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOverride;

impl OverridePolicy for NoOverride {
    #[inline]
    fn try_override(&self, _path: &str, _original: &dyn Reflect) -> Option<Value> {
        None
    }
}

/// Policy backed by a closure, see [`from_fn`]
#[derive(Clone, Copy)]
pub struct FnPolicy<F>(F);

/// Wrap a closure as a policy
///
/// # Example
/// ```rust,ignore
/// let policy = from_fn(|path, original| {
///     (path == "Age").then(|| Value::from(original.as_i64().unwrap_or(0) + 1))
/// });
/// ```
#[inline]
#[must_use]
pub fn from_fn<F>(f: F) -> FnPolicy<F>
where
    F: Fn(&str, &dyn Reflect) -> Option<Value> + Send + Sync,
{
    FnPolicy(f)
}

impl<F> OverridePolicy for FnPolicy<F>
where
    F: Fn(&str, &dyn Reflect) -> Option<Value> + Send + Sync,
{
    #[inline]
    fn try_override(&self, path: &str, original: &dyn Reflect) -> Option<Value> {
        (self.0)(path, original)
    }
}

impl<F> Debug for FnPolicy<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPolicy").finish_non_exhaustive()
    }
}

/// Exact-path table of constant replacements
///
/// Paths use the canonical rendering, e.g. `PropertyB.DictProp[key].Name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathOverrides {
    entries: IndexMap<String, Value>,
}

impl PathOverrides {
    /// Empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With replacement for `path`
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(path, value);
        self
    }

    /// Add or replace the entry for `path`, returning the previous value
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(path.into(), value.into())
    }

    /// Replacement registered for `path`
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.entries.get(path)
    }

    /// Registered paths in insertion order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OverridePolicy for PathOverrides {
    fn try_override(&self, path: &str, _original: &dyn Reflect) -> Option<Value> {
        self.entries.get(path).cloned()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PathOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for PathOverrides {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (path, value) in iter {
            self.insert(path, value);
        }
    }
}

/// Two policies where the first to handle a path wins, see
/// [`OverridePolicyExt::or`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Or<A, B> {
    first: A,
    second: B,
}

impl<A: OverridePolicy, B: OverridePolicy> OverridePolicy for Or<A, B> {
    fn try_override(&self, path: &str, original: &dyn Reflect) -> Option<Value> {
        self.first
            .try_override(path, original)
            .or_else(|| self.second.try_override(path, original))
    }
}

/// Combinators for policies
pub trait OverridePolicyExt: OverridePolicy + Sized {
    /// Ask `self` first, then `other` for paths `self` declines
    #[must_use]
    fn or<P: OverridePolicy>(self, other: P) -> Or<Self, P> {
        Or {
            first: self,
            second: other,
        }
    }
}

impl<T: OverridePolicy> OverridePolicyExt for T {}
