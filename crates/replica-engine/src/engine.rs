//! Traversal engine
//!
//! Walks an original graph through its field enumerator and builds the
//! replica, asking the override policy at every slot before copying it.
//!
//! # Deep mode
//! Every reachable node is visited. For each child of a container the policy
//! is asked first; a handled child takes the replacement and is not descended
//! into, a declined child is copied (scalars) or walked (containers). The root
//! of a container graph is never offered to the policy; a scalar root is
//! offered at the empty path.
//!
//! # Shallow mode
//! The root must be a record. Only its direct members are offered to the
//! policy; declined members are snapshotted without further queries.

use crate::config::ReplicaConfig;
use crate::error::ReplicaError;
use crate::policy::OverridePolicy;
use crate::replica::Replica;
use replica_value::{snapshot, FieldPath, Map, Node, Record, Reflect, Shape, Value, ValueError};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Traversal depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Direct members of the root only
    Shallow,
    /// Every reachable node
    Deep,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shallow => "shallow",
            Self::Deep => "deep",
        })
    }
}

/// Counters from one traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    /// Slots entered, root included
    pub nodes_visited: usize,
    /// Policy queries made
    pub queried: usize,
    /// Queries the policy handled
    pub overridden: usize,
    /// Deepest path reached, in segments
    pub max_depth_reached: usize,
}

/// Configurable entry point for building replicas
///
/// # Example
/// ```rust,ignore
/// let replicator = Replicator::new(ReplicaConfig::new().with_max_depth(32));
/// let replica = replicator.deep(&original, &PathOverrides::new().with("PropertyA", "x"))?;
/// assert_eq!(replica["PropertyA"], "x");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Replicator {
    config: ReplicaConfig,
}

impl Replicator {
    /// Create replicator with configuration
    #[inline]
    #[must_use]
    pub fn new(config: ReplicaConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ReplicaConfig {
        &self.config
    }

    /// Replicate every reachable node
    ///
    /// # Errors
    /// Returns error if a declined slot holds an opaque value or the depth
    /// limit is exceeded
    pub fn deep<P>(&self, original: &dyn Reflect, policy: &P) -> Result<Replica, ReplicaError>
    where
        P: OverridePolicy + ?Sized,
    {
        self.run(Mode::Deep, original, policy)
    }

    /// Replicate the direct members of a record root
    ///
    /// # Errors
    /// Returns [`ReplicaError::NotARecord`] for non-record roots, or an error
    /// if a declined member cannot be snapshotted
    pub fn shallow<P>(&self, original: &dyn Reflect, policy: &P) -> Result<Replica, ReplicaError>
    where
        P: OverridePolicy + ?Sized,
    {
        self.run(Mode::Shallow, original, policy)
    }

    /// Replicate in the given mode
    ///
    /// # Errors
    /// See [`Replicator::deep`] and [`Replicator::shallow`]
    pub fn run<P>(
        &self,
        mode: Mode,
        original: &dyn Reflect,
        policy: &P,
    ) -> Result<Replica, ReplicaError>
    where
        P: OverridePolicy + ?Sized,
    {
        tracing::debug!("Starting {} replica", mode);

        let mut traversal = Traversal {
            policy,
            config: &self.config,
            stats: TraversalStats::default(),
        };
        let result = match mode {
            Mode::Deep => traversal.deep_root(original),
            Mode::Shallow => traversal.shallow_root(original),
        };

        match result {
            Ok(value) => {
                let stats = traversal.stats;
                tracing::debug!(
                    nodes_visited = stats.nodes_visited,
                    queried = stats.queried,
                    overridden = stats.overridden,
                    max_depth = stats.max_depth_reached,
                    "Finished {} replica",
                    mode
                );
                Ok(Replica::new(value, mode, stats))
            }
            Err(e) => {
                tracing::debug!("{} replica failed: {}", mode, e);
                Err(e)
            }
        }
    }
}

/// Transient state of one call
struct Traversal<'a, P: ?Sized> {
    policy: &'a P,
    config: &'a ReplicaConfig,
    stats: TraversalStats,
}

impl<P: OverridePolicy + ?Sized> Traversal<'_, P> {
    fn deep_root(&mut self, original: &dyn Reflect) -> Result<Value, ReplicaError> {
        let root = FieldPath::root();
        self.enter(&root)?;
        match original.reflect() {
            node @ (Node::Null | Node::Scalar(_)) => {
                Ok(self.query(&root, original).unwrap_or_else(|| copy(node)))
            }
            node => self.descend(node, &root),
        }
    }

    fn shallow_root(&mut self, original: &dyn Reflect) -> Result<Value, ReplicaError> {
        let root = FieldPath::root();
        self.enter(&root)?;
        match original.reflect() {
            Node::Record(fields) => {
                let mut record = Record::with_capacity(fields.len());
                for (name, field) in fields {
                    let child = root.member(name);
                    self.enter(&child)?;
                    let value = match self.query(&child, field) {
                        Some(replacement) => replacement,
                        None => snapshot(field, &child)?,
                    };
                    record.insert(name.to_string(), value);
                }
                Ok(Value::Record(record))
            }
            Node::Opaque(type_name) => Err(ValueError::UnsupportedShape {
                path: String::new(),
                type_name,
            }
            .into()),
            node => Err(ReplicaError::NotARecord {
                found: node.shape().unwrap_or(Shape::Null),
            }),
        }
    }

    /// Override first, else copy or walk
    fn slot(&mut self, original: &dyn Reflect, path: &FieldPath) -> Result<Value, ReplicaError> {
        self.enter(path)?;
        if let Some(replacement) = self.query(path, original) {
            return Ok(replacement);
        }
        match original.reflect() {
            node @ (Node::Null | Node::Scalar(_)) => Ok(copy(node)),
            node => self.descend(node, path),
        }
    }

    /// Rebuild a container; children already carry their own query
    fn descend(&mut self, node: Node<'_>, path: &FieldPath) -> Result<Value, ReplicaError> {
        match node {
            Node::Record(fields) => {
                let mut record = Record::with_capacity(fields.len());
                for (name, field) in fields {
                    let value = self.slot(field, &path.member(name))?;
                    record.insert(name.to_string(), value);
                }
                Ok(Value::Record(record))
            }
            Node::Sequence(items) => {
                let mut sequence = Vec::with_capacity(items.len());
                for (position, item) in items.into_iter().enumerate() {
                    sequence.push(self.slot(item, &path.index(position))?);
                }
                Ok(Value::Sequence(sequence))
            }
            Node::Map(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, entry) in entries {
                    let value = self.slot(entry, &path.key(key.to_string()))?;
                    map.insert(key, value);
                }
                Ok(Value::Map(map))
            }
            Node::Opaque(type_name) => Err(ValueError::UnsupportedShape {
                path: path.to_string(),
                type_name,
            }
            .into()),
            node @ (Node::Null | Node::Scalar(_)) => Ok(copy(node)),
        }
    }

    fn enter(&mut self, path: &FieldPath) -> Result<(), ReplicaError> {
        let depth = path.depth();
        if let Some(limit) = self.config.max_depth {
            if depth > limit {
                return Err(ReplicaError::DepthLimitExceeded {
                    path: path.to_string(),
                    limit,
                });
            }
        }
        if self.config.collect_stats {
            self.stats.nodes_visited += 1;
            self.stats.max_depth_reached = self.stats.max_depth_reached.max(depth);
        }
        Ok(())
    }

    fn query(&mut self, path: &FieldPath, original: &dyn Reflect) -> Option<Value> {
        let rendered = path.to_string();
        let replacement = self.policy.try_override(&rendered, original);
        if self.config.collect_stats {
            self.stats.queried += 1;
            if replacement.is_some() {
                self.stats.overridden += 1;
            }
        }
        if replacement.is_some() {
            tracing::trace!(path = %rendered, "Override applied");
        }
        replacement
    }
}

fn copy(node: Node<'_>) -> Value {
    match node {
        Node::Scalar(scalar) => scalar.to_value(),
        _ => Value::Null,
    }
}

/// Shallow replica with the default configuration
///
/// # Errors
/// See [`Replicator::shallow`]
pub fn shallow_clone_with_modifier<P>(
    original: &dyn Reflect,
    policy: &P,
) -> Result<Replica, ReplicaError>
where
    P: OverridePolicy + ?Sized,
{
    Replicator::default().shallow(original, policy)
}

/// Deep replica with the default configuration
///
/// # Errors
/// See [`Replicator::deep`]
pub fn deep_clone_with_modifier<P>(
    original: &dyn Reflect,
    policy: &P,
) -> Result<Replica, ReplicaError>
where
    P: OverridePolicy + ?Sized,
{
    Replicator::default().deep(original, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{from_fn, NoOverride, PathOverrides};
    use pretty_assertions::assert_eq;
    use replica_value::{classify, Opaque};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn nested() -> Value {
        Value::record([
            ("Name", Value::from("n")),
            (
                "Items",
                Value::sequence([Value::record([("Id", 1)]), Value::record([("Id", 2)])]),
            ),
        ])
    }

    #[test]
    fn scalar_root_queried_at_empty_path() {
        let policy = from_fn(|path, _| path.is_empty().then(|| Value::from("root")));
        let replica = deep_clone_with_modifier(&5, &policy).unwrap();
        assert_eq!(replica.value(), &Value::from("root"));
        assert_eq!(replica.stats().queried, 1);
    }

    #[test]
    fn container_root_not_queried() {
        let policy = from_fn(|path, _| path.is_empty().then(|| Value::Null));
        let replica = deep_clone_with_modifier(&nested(), &policy).unwrap();
        assert_eq!(replica.value(), &nested());
    }

    #[test]
    fn stats_count_slots_and_queries() {
        let policy = PathOverrides::new().with("Items[1]", "gone");
        let replica = deep_clone_with_modifier(&nested(), &policy).unwrap();
        let stats = replica.stats();
        // root, Name, Items, Items[0], Items[0].Id, Items[1]
        assert_eq!(stats.nodes_visited, 6);
        assert_eq!(stats.queried, 5);
        assert_eq!(stats.overridden, 1);
        assert_eq!(stats.max_depth_reached, 3);
        assert_eq!(replica.mode(), Mode::Deep);
    }

    #[test]
    fn stats_can_be_disabled() {
        let replicator = Replicator::new(ReplicaConfig::new().with_collect_stats(false));
        let replica = replicator.deep(&nested(), &NoOverride).unwrap();
        assert_eq!(replica.stats(), &TraversalStats::default());
    }

    #[test]
    fn depth_limit_names_first_offending_path() {
        let replicator = Replicator::new(ReplicaConfig::new().with_max_depth(2));
        let err = replicator.deep(&nested(), &NoOverride).unwrap_err();
        assert_eq!(
            err,
            ReplicaError::DepthLimitExceeded {
                path: "Items[0].Id".to_string(),
                limit: 2,
            }
        );
    }

    #[test]
    fn opaque_slot_fails_unless_overridden() {
        let original = BTreeMap::from([("timeout", Opaque::new(Duration::from_secs(3)))]);
        let err = deep_clone_with_modifier(&original, &NoOverride).unwrap_err();
        assert_eq!(err.path(), Some("[timeout]"));

        let policy = PathOverrides::new().with("[timeout]", 3_u64);
        let replica = deep_clone_with_modifier(&original, &policy).unwrap();
        assert_eq!(replica.get_path("[timeout]").unwrap().as_u64(), Some(3));
    }

    #[test]
    fn shallow_rejects_non_records() {
        let err = shallow_clone_with_modifier(&vec![1, 2], &NoOverride).unwrap_err();
        assert_eq!(
            err,
            ReplicaError::NotARecord {
                found: Shape::Sequence
            }
        );
    }

    #[test]
    fn shallow_snapshot_skips_nested_queries() {
        let policy = from_fn(|path, _| (path == "Items[0].Id").then(|| Value::from(99)));
        let replica = shallow_clone_with_modifier(&nested(), &policy).unwrap();
        assert_eq!(replica.value(), &nested());
        assert_eq!(replica.stats().queried, 2);
        assert_eq!(replica.mode(), Mode::Shallow);
    }

    #[test]
    fn replica_shape_matches_classifier() {
        let originals: Vec<Box<dyn Reflect>> = vec![
            Box::new(None::<u8>),
            Box::new("text"),
            Box::new(vec![1, 2]),
            Box::new(BTreeMap::from([("k", 1)])),
            Box::new(nested()),
        ];
        for original in &originals {
            let replica = deep_clone_with_modifier(original.as_ref(), &NoOverride).unwrap();
            assert_eq!(Ok(replica.shape()), classify(original.as_ref()));
        }
        let opaque = Opaque::new(());
        assert!(classify(&opaque).is_err());
        assert!(deep_clone_with_modifier(&opaque, &NoOverride).is_err());
    }

    #[test]
    fn mode_renders_lowercase() {
        assert_eq!(Mode::Deep.to_string(), "deep");
        assert_eq!(Mode::Shallow.to_string(), "shallow");
    }
}
