use compat_core::prelude::*;
use compat_test_utils::{
    builtin_registry, client_payload, scenario_defaults, scenario_resolver, server_payload,
    tagging_change,
};
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn migrate_then_resolve_manually() {
    let registry = builtin_registry();
    let resolver = scenario_resolver();

    let migrated = registry.migrate(&server_payload(), "1.1", "1.0").unwrap();
    assert_eq!(migrated, client_payload());

    let resolved = resolver.resolve(&migrated);
    assert_eq!(
        resolved,
        Payload::from_iter([
            ("task_id", FieldValue::from("t1")),
            ("retries", FieldValue::from(3)),
            ("owner", FieldValue::from("airflow")),
        ])
    );
}

#[test]
fn scenario_precedence_without_explicit_values() {
    let out = scenario_resolver().resolve(&Payload::from_iter([("task_id", "x")]));
    assert_eq!(
        out,
        Payload::from_iter([
            ("task_id", FieldValue::from("x")),
            ("retries", FieldValue::from(2)),
            ("owner", FieldValue::from("dag_owner")),
        ])
    );
}

#[test]
fn scenario_explicit_owner_wins() {
    let out = scenario_resolver().resolve(&Payload::from_iter([
        ("task_id", "x"),
        ("owner", "explicit_owner"),
    ]));
    assert_eq!(out.get("owner"), Some(&FieldValue::from("explicit_owner")));
}

#[test]
fn pipeline_serves_old_and_current_clients() {
    let registry = builtin_registry();
    let pipeline =
        CompatPipeline::new(&registry, CompatConfig::new().with_defaults(scenario_defaults()));

    let old = pipeline.serve(&server_payload(), "1.0").unwrap();
    assert!(!old.contains("dag_version_id"));

    let current = pipeline.serve(&server_payload(), "1.1").unwrap();
    assert_eq!(current.get("dag_version_id"), Some(&FieldValue::Int(99)));
}

#[test]
fn pipeline_never_chains_rules() {
    let mut registry = MigrationRegistry::new();
    registry.register(tagging_change("1.2", "1.1")).unwrap();
    registry.register(tagging_change("1.1", "1.0")).unwrap();

    let pipeline = CompatPipeline::new(&registry, CompatConfig::new().with_server_version("1.2"));

    let one_hop = pipeline.serve(&server_payload(), "1.1").unwrap();
    assert_eq!(one_hop.get("migrated_by"), Some(&FieldValue::from("1.2->1.1")));

    let err = pipeline.serve(&server_payload(), "1.0").unwrap_err();
    assert!(err.is_incompatible());
}

#[test]
fn independent_registries_in_one_process() {
    let builtin = builtin_registry();
    let empty = MigrationRegistry::new();

    let a = CompatPipeline::new(&builtin, CompatConfig::new());
    let b = CompatPipeline::new(&empty, CompatConfig::new());

    assert!(a.serve(&server_payload(), "1.0").is_ok());
    assert!(b.serve(&server_payload(), "1.0").unwrap_err().is_incompatible());
}

#[test]
fn pass_through_policy_returns_unmigrated_payload() {
    let registry = MigrationRegistry::new();
    let config = CompatConfig::new()
        .with_missing_rule(MissingRulePolicy::PassThrough)
        .with_defaults(scenario_defaults());
    let pipeline = CompatPipeline::new(&registry, config);

    let out = pipeline.serve(&server_payload(), "1.0").unwrap();
    assert_eq!(out, server_payload());
}

#[test]
fn config_file_drives_pipeline() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
server_version = "1.1"

[defaults.schema]
retries = 1
queue = "default"

[defaults.dag]
retries = 2
"#
    )
    .unwrap();

    let config = CompatConfig::load(file.path()).unwrap();
    let registry = builtin_registry();
    let pipeline = CompatPipeline::new(&registry, config);

    let out = pipeline.serve(&Payload::from_iter([("task_id", "x")]), "1.1").unwrap();
    assert_eq!(
        out,
        Payload::from_iter([
            ("task_id", FieldValue::from("x")),
            ("retries", FieldValue::from(2)),
            ("queue", FieldValue::from("default")),
        ])
    );
}

#[test]
fn config_file_with_unknown_extension() {
    let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
    let err = CompatConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, compat_core::ConfigError::UnknownFormat(_)));
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CompatConfig::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, compat_core::ConfigError::Io { .. }));
}
