//! Concurrent replicas sharing one policy

use rayon::prelude::*;
use replica_engine::prelude::*;
use replica_test_utils::{sample_envelope, sample_overrides, RecordingPolicy};
use std::sync::Arc;

#[test]
fn parallel_deep_clones_share_policy() {
    let policy: Arc<dyn OverridePolicy> = Arc::new(sample_overrides());

    let replicas: Vec<Replica> = (0..64)
        .into_par_iter()
        .map(|i| {
            let mut original = sample_envelope();
            original.property_c.name = format!("item-{i}");
            deep_clone_with_modifier(&original, &policy)
        })
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(replicas.len(), 64);
    for replica in &replicas {
        assert_eq!(replica["PropertyA"], "modifiedPropertyA");
        assert_eq!(replica["PropertyC"]["Name"], "modifiedName");
        assert_eq!(replica["PropertyB"]["ListProp"][0]["ListProp"][0], 100);
    }
}

#[test]
fn parallel_calls_do_not_interfere() {
    let policy = RecordingPolicy::new(NoOverride);
    let replicator = Replicator::default();

    let names: Vec<String> = (0..32)
        .into_par_iter()
        .map(|i| {
            let mut original = sample_envelope();
            original.property_a = format!("root-{i}");
            let replica = replicator.deep(&original, &policy).unwrap();
            replica["PropertyA"].as_str().unwrap_or_default().to_string()
        })
        .collect();

    for (i, name) in names.iter().enumerate() {
        assert_eq!(name, &format!("root-{i}"));
    }
    assert_eq!(policy.count("PropertyA"), 32);
    assert_eq!(policy.count("PropertyB.DictProp[key].Name"), 32);
}
