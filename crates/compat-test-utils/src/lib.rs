//! Testing utilities for the compat workspace
//!
//! Shared fixtures for the task-instance scenario.

#![allow(missing_docs)]

use compat_defaults::{DefaultResolver, DefaultsConfig, LayerKind};
use compat_payload::{FieldValue, Payload};
use compat_versioning::{MigrationRegistry, VersionChange};

pub fn server_payload() -> Payload {
    Payload::from_iter([
        ("task_id", FieldValue::from("t1")),
        ("retries", FieldValue::from(3)),
        ("owner", FieldValue::from("airflow")),
        ("dag_version_id", FieldValue::from(99)),
    ])
}

pub fn client_payload() -> Payload {
    server_payload().without(["dag_version_id"])
}

pub fn scenario_defaults() -> DefaultsConfig {
    DefaultsConfig::new()
        .with_layer(
            LayerKind::Schema,
            Payload::from_iter([
                ("retries", FieldValue::from(1)),
                ("owner", FieldValue::from("airflow")),
            ]),
        )
        .with_layer(LayerKind::Client, Payload::from_iter([("owner", "sdk_client")]))
        .with_layer(LayerKind::Dag, Payload::from_iter([("retries", 2)]))
        .with_layer(LayerKind::Partial, Payload::from_iter([("owner", "dag_owner")]))
}

pub fn scenario_resolver() -> DefaultResolver {
    DefaultResolver::from_config(scenario_defaults())
}

pub fn builtin_registry() -> MigrationRegistry {
    MigrationRegistry::with_builtin_rules().unwrap()
}

/// Rule that copies the payload and records which rule ran
pub fn tagging_change(origin: &str, target: &str) -> VersionChange {
    let tag = format!("{origin}->{target}");
    VersionChange::new(origin, target, format!("tag {tag}"), move |p: &Payload| {
        let mut out = p.clone();
        out.insert("migrated_by", tag.clone());
        out
    })
}
