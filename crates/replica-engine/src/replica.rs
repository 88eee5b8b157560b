//! Replica output
//!
//! A [`Replica`] is read through the original's shape without naming a
//! concrete type: index by member name or position, resolve canonical paths,
//! or chain accessors with [`Replica::view`]. To get a typed value back, call
//! [`Replica::materialize`].

use crate::engine::{Mode, TraversalStats};
use crate::error::ReplicaError;
use replica_value::{FieldPath, FromValue, MapKey, Node, Reflect, Shape, Value, ValueError, ValueView};
use std::ops::Index;

/// Output graph of one traversal
#[derive(Debug, Clone, PartialEq)]
pub struct Replica {
    value: Value,
    mode: Mode,
    stats: TraversalStats,
}

impl Replica {
    pub(crate) fn new(value: Value, mode: Mode, stats: TraversalStats) -> Self {
        Self { value, mode, stats }
    }

    /// Root of the replica graph
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take ownership of the replica graph
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Mode the replica was built in
    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Counters from the traversal that built this replica
    #[inline]
    #[must_use]
    pub fn stats(&self) -> &TraversalStats {
        &self.stats
    }

    /// Shape of the root
    #[inline]
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.value.shape()
    }

    /// Chained reader rooted at the replica
    #[inline]
    #[must_use]
    pub fn view(&self) -> ValueView<'_> {
        self.value.view()
    }

    /// Value at a canonical path such as `PropertyB.DictProp[key].Name`
    ///
    /// # Errors
    /// Returns error naming the first segment that does not match
    pub fn get_path(&self, path: &str) -> Result<&Value, ValueError> {
        self.value.get_path(path)
    }

    /// Value at a parsed path
    ///
    /// # Errors
    /// Returns error naming the first segment that does not match
    pub fn resolve(&self, path: &FieldPath) -> Result<&Value, ValueError> {
        self.value.resolve(path)
    }

    /// Map entry of the root by typed key
    #[must_use]
    pub fn get_key(&self, key: &MapKey) -> Option<&Value> {
        self.value.get_key(key)
    }

    /// Rebuild a typed value from the replica
    ///
    /// A policy replacement of the wrong kind is reported here with its path.
    ///
    /// # Errors
    /// Returns [`ReplicaError::Value`] with the first mismatch
    pub fn materialize<T: FromValue>(&self) -> Result<T, ReplicaError> {
        T::from_value(&self.value, &FieldPath::root()).map_err(ReplicaError::from)
    }
}

impl Index<&str> for Replica {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        &self.value[name]
    }
}

impl Index<usize> for Replica {
    type Output = Value;

    fn index(&self, position: usize) -> &Value {
        &self.value[position]
    }
}

impl AsRef<Value> for Replica {
    fn as_ref(&self) -> &Value {
        &self.value
    }
}

impl From<Replica> for Value {
    fn from(replica: Replica) -> Self {
        replica.value
    }
}

/// A replica can itself be replicated
impl Reflect for Replica {
    fn reflect(&self) -> Node<'_> {
        self.value.reflect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn replica() -> Replica {
        let value = Value::record([
            ("Name", Value::from("John")),
            ("Tags", Value::sequence(["a"])),
        ]);
        Replica::new(value, Mode::Deep, TraversalStats::default())
    }

    #[test]
    fn index_and_paths() {
        let replica = replica();
        assert_eq!(replica["Name"], "John");
        assert_eq!(replica["Tags"][0], "a");
        assert!(replica["Missing"].is_null());
        assert_eq!(replica.get_path("Tags[0]").unwrap().as_str(), Some("a"));
        assert_eq!(replica.shape(), Shape::Record);
    }

    #[test]
    fn materialize_reports_path() {
        let err = replica().materialize::<Vec<String>>().unwrap_err();
        assert!(err.is_policy_violation());
        assert_eq!(err.path(), Some(""));
    }

    #[test]
    fn into_value_gives_graph() {
        let value: Value = replica().into();
        assert_eq!(value["Name"], "John");
    }
}
