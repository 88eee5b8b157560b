//! Testing utilities for the replica workspace
//!
//! Shared fixtures, sample policies and tracing setup.

#![allow(missing_docs)]

use parking_lot::Mutex;
use replica_engine::{from_fn, OverridePolicy, PathOverrides};
use replica_value::{FromValue, Reflect, Value};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Reflect, FromValue)]
#[replica(rename_all = "PascalCase")]
pub struct Envelope {
    pub property_a: String,
    pub property_b: Bundle,
    pub property_c: Item,
    pub property_d: Tally,
}

#[derive(Debug, Clone, PartialEq, Reflect, FromValue)]
#[replica(rename_all = "PascalCase")]
pub struct Bundle {
    pub array_prop: Vec<String>,
    pub dict_prop: HashMap<String, Item>,
    pub list_prop: Vec<Tally>,
}

#[derive(Debug, Clone, PartialEq, Reflect, FromValue)]
#[replica(rename_all = "PascalCase")]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Reflect, FromValue)]
#[replica(rename_all = "PascalCase")]
pub struct Tally {
    pub dict_prop: HashMap<String, i32>,
    pub list_prop: Vec<i32>,
}

/// Value-type root with a nested value-type member
#[derive(Debug, Clone, PartialEq, Reflect, FromValue)]
#[replica(rename_all = "PascalCase")]
pub struct Point {
    pub property_a: i32,
    pub property_b: Label,
}

#[derive(Debug, Clone, PartialEq, Reflect, FromValue)]
#[replica(rename_all = "PascalCase")]
pub struct Label {
    pub property_alpha: i32,
    pub property_beta: String,
}

#[derive(Debug, Clone, PartialEq, Reflect, FromValue)]
#[replica(rename_all = "PascalCase")]
pub struct Person {
    pub name: String,
    pub age: i32,
}

pub fn sample_item() -> Item {
    Item {
        id: 1,
        name: "name".to_string(),
        description: "description".to_string(),
    }
}

pub fn sample_tally() -> Tally {
    Tally {
        dict_prop: HashMap::from([("key".to_string(), 1)]),
        list_prop: vec![1],
    }
}

pub fn sample_envelope() -> Envelope {
    Envelope {
        property_a: "propertyA".to_string(),
        property_b: Bundle {
            array_prop: vec!["arrayProp".to_string()],
            dict_prop: HashMap::from([("key".to_string(), sample_item())]),
            list_prop: vec![sample_tally()],
        },
        property_c: sample_item(),
        property_d: sample_tally(),
    }
}

pub fn sample_point() -> Point {
    Point {
        property_a: 1,
        property_b: Label {
            property_alpha: 2,
            property_beta: "foo".to_string(),
        },
    }
}

pub fn sample_person() -> Person {
    Person {
        name: "John".to_string(),
        age: 30,
    }
}

/// Exact-path table covering every level of [`sample_envelope`]
pub fn sample_overrides() -> PathOverrides {
    PathOverrides::new()
        .with("PropertyA", "modifiedPropertyA")
        .with("PropertyB.ArrayProp[0]", "modifiedArrayProp")
        .with("PropertyB.DictProp[key].Name", "modifiedName")
        .with("PropertyB.DictProp[key].Description", "modifiedDescription")
        .with("PropertyB.ListProp[0].DictProp[key]", 100)
        .with("PropertyB.ListProp[0].ListProp[0]", 100)
        .with("PropertyC.Id", 2)
        .with("PropertyC.Name", "modifiedName")
        .with("PropertyC.Description", "modifiedDescription")
        .with("PropertyD.ListProp[0]", 1)
}

/// Replaces `PropertyB.PropertyBeta` with `"bar"`
pub fn struct_policy() -> PathOverrides {
    PathOverrides::new().with("PropertyB.PropertyBeta", "bar")
}

/// Increments `Age` from the original value
pub fn age_policy() -> impl OverridePolicy {
    from_fn(|path, original| {
        (path == "Age").then(|| Value::from(original.as_i64().unwrap_or(0) + 1))
    })
}

/// Records every path it is asked about, then delegates
#[derive(Debug, Default)]
pub struct RecordingPolicy<P> {
    inner: P,
    seen: Mutex<Vec<String>>,
}

impl<P: OverridePolicy> RecordingPolicy<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Paths queried so far, in query order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }

    /// Number of times `path` was queried
    pub fn count(&self, path: &str) -> usize {
        self.seen.lock().iter().filter(|p| p.as_str() == path).count()
    }

    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}

impl<P: OverridePolicy> OverridePolicy for RecordingPolicy<P> {
    fn try_override(&self, path: &str, original: &dyn Reflect) -> Option<Value> {
        self.seen.lock().push(path.to_string());
        self.inner.try_override(path, original)
    }
}

/// Install a test-friendly tracing subscriber (idempotent)
///
/// Filter comes from `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
