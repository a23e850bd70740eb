//! Demo scenario
//!
//! A server on task-instance schema `1.1` answering a client that may be on
//! `1.0`, with one value per default layer.

use compat_defaults::{DefaultsConfig, LayerKind, ResolvedPayload};
use compat_payload::{FieldValue, Payload, TaskInstanceV11, VersionedModel};
use compat_versioning::MigrationRegistry;

use crate::config::CompatConfig;
use crate::error::CompatError;
use crate::pipeline::CompatPipeline;

/// Task id used when none is given
pub const DEMO_TASK_ID: &str = "transform_users";

/// DAG version id used when none is given
pub const DEMO_DAG_VERSION_ID: i64 = 101;

/// Default layers of the demo scenario
#[must_use]
pub fn demo_defaults() -> DefaultsConfig {
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

/// Configuration of the demo scenario
#[must_use]
pub fn demo_config() -> CompatConfig {
    CompatConfig::new().with_defaults(demo_defaults())
}

/// Build a `1.1` task instance and serve it to `client_version`
///
/// The payload is tagged with the configured server version, so a
/// mismatched configuration shows up as a missing rule.
///
/// # Errors
/// Propagates pipeline errors
pub fn simulate_request(
    registry: &MigrationRegistry,
    config: CompatConfig,
    client_version: &str,
    task: &TaskInstanceV11,
) -> Result<Payload, CompatError> {
    simulate_request_traced(registry, config, client_version, task).map(|r| r.values)
}

/// Same as [`simulate_request`], keeping the source of each resolved field
///
/// # Errors
/// Propagates pipeline errors
pub fn simulate_request_traced(
    registry: &MigrationRegistry,
    config: CompatConfig,
    client_version: &str,
    task: &TaskInstanceV11,
) -> Result<ResolvedPayload, CompatError> {
    let payload = task.to_payload()?;
    CompatPipeline::new(registry, config).serve_traced(&payload, client_version)
}
