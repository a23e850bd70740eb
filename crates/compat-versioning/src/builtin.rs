//! Built-in rules for the task-instance entity
//!
//! Schema `1.1` added `dag_version_id`. Older clients on `1.0` must not
//! receive it; payloads coming up from `1.0` get it as null.

use compat_payload::{FieldValue, TaskInstanceV10, TaskInstanceV11, VersionedModel};

use crate::change::VersionChange;
use crate::transforms::{drop_fields, insert_default};

/// Task-instance changes between `1.0` and `1.1`, one per direction
#[must_use]
pub fn task_instance_changes() -> Vec<VersionChange> {
    vec![
        VersionChange::new(
            TaskInstanceV11::SCHEMA_VERSION,
            TaskInstanceV10::SCHEMA_VERSION,
            "Remove dag_version_id for backward compatibility",
            drop_fields([TaskInstanceV11::DAG_VERSION_ID]),
        ),
        VersionChange::new(
            TaskInstanceV10::SCHEMA_VERSION,
            TaskInstanceV11::SCHEMA_VERSION,
            "Add dag_version_id as null for forward compatibility",
            insert_default(TaskInstanceV11::DAG_VERSION_ID, FieldValue::Null),
        ),
    ]
}
