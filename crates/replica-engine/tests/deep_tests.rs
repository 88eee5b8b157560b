//! Deep replicas over record, struct and anonymous-shape graphs

use pretty_assertions::assert_eq;
use replica_engine::prelude::*;
use replica_test_utils::{
    age_policy, init_tracing, sample_envelope, sample_overrides, sample_person, sample_point,
    struct_policy, Envelope, Point, RecordingPolicy,
};

#[test]
fn deep_clone_overrides_every_level() {
    init_tracing();
    let replica = deep_clone_with_modifier(&sample_envelope(), &sample_overrides()).unwrap();

    assert_eq!(replica["PropertyA"], "modifiedPropertyA");
    assert_eq!(replica["PropertyB"]["ArrayProp"][0], "modifiedArrayProp");
    assert_eq!(replica["PropertyB"]["DictProp"]["key"]["Name"], "modifiedName");
    assert_eq!(
        replica["PropertyB"]["DictProp"]["key"]["Description"],
        "modifiedDescription"
    );
    assert_eq!(replica["PropertyB"]["ListProp"][0]["DictProp"]["key"], 100);
    assert_eq!(replica["PropertyB"]["ListProp"][0]["ListProp"][0], 100);
    assert_eq!(replica["PropertyC"]["Id"], 2);
    assert_eq!(replica["PropertyC"]["Name"], "modifiedName");
    assert_eq!(replica["PropertyC"]["Description"], "modifiedDescription");
}

#[test]
fn untargeted_siblings_keep_original_values() {
    let replica = deep_clone_with_modifier(&sample_envelope(), &sample_overrides()).unwrap();

    assert_eq!(replica.get_path("PropertyB.DictProp[key].Id").unwrap(), &1);
    assert_eq!(replica.get_path("PropertyD.DictProp[key]").unwrap(), &1);
    assert_eq!(replica.get_path("PropertyD.ListProp[0]").unwrap(), &1);
}

#[test]
fn deep_replica_materializes_with_overrides() {
    let replica = deep_clone_with_modifier(&sample_envelope(), &sample_overrides()).unwrap();
    let typed: Envelope = replica.materialize().unwrap();

    assert_eq!(typed.property_a, "modifiedPropertyA");
    assert_eq!(typed.property_b.dict_prop["key"].name, "modifiedName");
    assert_eq!(typed.property_b.list_prop[0].list_prop, vec![100]);
    assert_eq!(typed.property_c.id, 2);
    assert_eq!(typed.property_d, sample_envelope().property_d);
}

#[test]
fn value_type_root_overrides_nested_member_only() {
    let replica = deep_clone_with_modifier(&sample_point(), &struct_policy()).unwrap();

    assert_eq!(replica["PropertyA"], 1);
    assert_eq!(replica["PropertyB"]["PropertyAlpha"], 2);
    assert_eq!(replica["PropertyB"]["PropertyBeta"], "bar");

    let typed: Point = replica.materialize().unwrap();
    assert_eq!(typed.property_b.property_beta, "bar");
    assert_eq!(sample_point().property_b.property_beta, "foo");
}

#[test]
fn policy_derives_replacement_from_original() {
    let replica = deep_clone_with_modifier(&sample_person(), &age_policy()).unwrap();

    assert_eq!(replica["Name"], "John");
    assert_eq!(replica["Age"], 31);
}

#[test]
fn overridden_container_is_not_descended() {
    let policy = RecordingPolicy::new(PathOverrides::new().with("PropertyB.DictProp", Value::Null));
    let replica = deep_clone_with_modifier(&sample_envelope(), &policy).unwrap();

    assert!(replica["PropertyB"]["DictProp"].is_null());
    assert!(policy
        .seen()
        .iter()
        .all(|path| !path.starts_with("PropertyB.DictProp[")));
}

#[test]
fn every_path_queried_exactly_once() {
    let policy = RecordingPolicy::new(NoOverride);
    deep_clone_with_modifier(&sample_envelope(), &policy).unwrap();

    let seen = policy.seen();
    let expected = [
        "PropertyA",
        "PropertyB",
        "PropertyB.ArrayProp",
        "PropertyB.ArrayProp[0]",
        "PropertyB.DictProp",
        "PropertyB.DictProp[key]",
        "PropertyB.DictProp[key].Id",
        "PropertyB.DictProp[key].Name",
        "PropertyB.DictProp[key].Description",
        "PropertyB.ListProp",
        "PropertyB.ListProp[0]",
        "PropertyB.ListProp[0].DictProp",
        "PropertyB.ListProp[0].DictProp[key]",
        "PropertyB.ListProp[0].ListProp",
        "PropertyB.ListProp[0].ListProp[0]",
        "PropertyC",
        "PropertyC.Id",
        "PropertyC.Name",
        "PropertyC.Description",
        "PropertyD",
        "PropertyD.DictProp",
        "PropertyD.DictProp[key]",
        "PropertyD.ListProp",
        "PropertyD.ListProp[0]",
    ];
    assert_eq!(seen, expected);
    assert!(expected.iter().all(|path| policy.count(path) == 1));
}

#[test]
fn policy_that_never_handles_reproduces_original() {
    let original = sample_envelope();
    let replica = deep_clone_with_modifier(&original, &NoOverride).unwrap();

    assert_eq!(replica.value(), &Value::from_reflect(&original).unwrap());
    assert_eq!(replica.materialize::<Envelope>().unwrap(), original);
}

#[test]
fn incompatible_replacement_fails_at_point_of_use() {
    let policy = PathOverrides::new().with("PropertyC.Id", "not a number");
    let replica = deep_clone_with_modifier(&sample_envelope(), &policy).unwrap();

    // Untyped reads see the replacement as-is
    assert_eq!(replica["PropertyC"]["Id"], "not a number");

    let err = replica.materialize::<Envelope>().unwrap_err();
    assert!(err.is_policy_violation());
    assert_eq!(err.path(), Some("PropertyC.Id"));

    let err = replica.view().at("PropertyC.Id").as_i64().unwrap_err();
    assert_eq!(
        err,
        ValueError::TypeMismatch {
            path: "PropertyC.Id".to_string(),
            expected: "int",
            found: "string",
        }
    );
}

#[test]
fn view_reports_missing_paths() {
    let replica = deep_clone_with_modifier(&sample_envelope(), &NoOverride).unwrap();

    assert_eq!(
        replica.view().field("PropertyB").field("DictProp").key("key").field("Name").as_str(),
        Ok("name")
    );
    assert_eq!(
        replica.view().at("PropertyB.DictProp[other]").value().unwrap_err(),
        ValueError::MissingKey {
            path: "PropertyB.DictProp[other]".to_string(),
        }
    );
    assert!(matches!(
        replica.view().at("PropertyB.ListProp[3]").value(),
        Err(ValueError::IndexOutOfBounds { index: 3, len: 1, .. })
    ));
}

#[test]
fn depth_limit_stops_runaway_graphs() {
    let replicator = Replicator::new(ReplicaConfig::new().with_max_depth(3));
    let err = replicator.deep(&sample_envelope(), &NoOverride).unwrap_err();
    assert_eq!(
        err,
        ReplicaError::DepthLimitExceeded {
            path: "PropertyB.DictProp[key].Id".to_string(),
            limit: 3,
        }
    );

    let boundary = Replicator::new(ReplicaConfig::new().with_max_depth(4));
    let err = boundary.deep(&sample_envelope(), &NoOverride).unwrap_err();
    assert_eq!(
        err,
        ReplicaError::DepthLimitExceeded {
            path: "PropertyB.ListProp[0].DictProp[key]".to_string(),
            limit: 4,
        }
    );

    let roomy = Replicator::new(ReplicaConfig::new().with_max_depth(5));
    let replica = roomy.deep(&sample_envelope(), &NoOverride).unwrap();
    assert_eq!(replica.stats().max_depth_reached, 5);
}
