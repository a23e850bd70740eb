//! Versioned entity models
//!
//! Typed views of the task-instance entity at each schema version. A model
//! knows its own version; the payload produced from it does not.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::payload::{Payload, PayloadError};
use crate::version::SchemaVersion;

/// Trait for entity models bound to one schema version
pub trait VersionedModel: Serialize + DeserializeOwned {
    /// Schema version this model's shape belongs to
    const SCHEMA_VERSION: &'static str;

    /// Schema version as an identifier
    #[inline]
    #[must_use]
    fn schema_version() -> SchemaVersion {
        SchemaVersion::from(Self::SCHEMA_VERSION)
    }

    /// Serialize into a payload
    ///
    /// # Errors
    /// Returns error if the model does not serialize to a flat object
    fn to_payload(&self) -> Result<Payload, PayloadError> {
        Payload::from_typed(self)
    }

    /// Deserialize from a payload of this model's version
    ///
    /// # Errors
    /// Returns error if fields are missing or mistyped
    fn from_payload(payload: &Payload) -> Result<Self, PayloadError> {
        payload.to_typed()
    }
}

/// Schema default for `retries`
pub const DEFAULT_RETRIES: i64 = 3;

/// Schema default for `owner`
pub const DEFAULT_OWNER: &str = "airflow";

fn default_retries() -> i64 {
    DEFAULT_RETRIES
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

/// Task instance at schema `1.0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInstanceV10 {
    pub task_id: String,
    #[serde(default = "default_retries")]
    pub retries: i64,
    #[serde(default = "default_owner")]
    pub owner: String,
}

impl TaskInstanceV10 {
    /// Create with schema defaults
    #[must_use]
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            retries: DEFAULT_RETRIES,
            owner: default_owner(),
        }
    }
}

impl VersionedModel for TaskInstanceV10 {
    const SCHEMA_VERSION: &'static str = "1.0";
}

/// Task instance at schema `1.1`, which adds `dag_version_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInstanceV11 {
    pub task_id: String,
    #[serde(default = "default_retries")]
    pub retries: i64,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default)]
    pub dag_version_id: Option<i64>,
}

impl TaskInstanceV11 {
    /// Field introduced in `1.1`
    pub const DAG_VERSION_ID: &'static str = "dag_version_id";

    /// Create with schema defaults
    #[must_use]
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            retries: DEFAULT_RETRIES,
            owner: default_owner(),
            dag_version_id: None,
        }
    }

    /// Set the DAG version id
    #[inline]
    #[must_use]
    pub fn with_dag_version_id(mut self, id: i64) -> Self {
        self.dag_version_id = Some(id);
        self
    }
}

impl VersionedModel for TaskInstanceV11 {
    const SCHEMA_VERSION: &'static str = "1.1";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    #[test]
    fn v11_payload_carries_null_dag_version_id() {
        let payload = TaskInstanceV11::new("transform_users").to_payload().unwrap();

        assert_eq!(payload.get("task_id"), Some(&FieldValue::from("transform_users")));
        assert_eq!(payload.get("retries"), Some(&FieldValue::Int(3)));
        assert_eq!(payload.get("owner"), Some(&FieldValue::from("airflow")));
        assert_eq!(payload.get(TaskInstanceV11::DAG_VERSION_ID), Some(&FieldValue::Null));
    }

    #[test]
    fn v11_with_dag_version_id() {
        let payload = TaskInstanceV11::new("t")
            .with_dag_version_id(101)
            .to_payload()
            .unwrap();
        assert_eq!(payload.get("dag_version_id"), Some(&FieldValue::Int(101)));
    }

    #[test]
    fn v10_from_payload_fills_schema_defaults() {
        let payload = Payload::from_iter([("task_id", "x")]);
        let model = TaskInstanceV10::from_payload(&payload).unwrap();
        assert_eq!(model, TaskInstanceV10::new("x"));
    }

    #[test]
    fn v10_from_payload_requires_task_id() {
        let payload = Payload::from_iter([("retries", 1)]);
        assert!(TaskInstanceV10::from_payload(&payload).is_err());
    }

    #[test]
    fn schema_versions() {
        assert_eq!(TaskInstanceV10::schema_version(), "1.0");
        assert_eq!(TaskInstanceV11::schema_version(), "1.1");
    }
}
