//! Compat Payload Model
//!
//! Dynamically typed payloads exchanged between schema versions.
//!
//! # Core Concepts
//!
//! - [`Payload`]: Field name to [`FieldValue`] mapping for one entity instance
//! - [`FieldValue`]: Tagged value over null, bool, integer and string
//! - [`SchemaVersion`]: Opaque version identifier, carried out-of-band
//! - [`VersionedModel`]: Typed entity bound to one schema version
//!
//! # Example
//!
//! ```rust
//! use compat_payload::{FieldValue, TaskInstanceV11, VersionedModel};
//!
//! let ti = TaskInstanceV11::new("transform_users").with_dag_version_id(101);
//! let payload = ti.to_payload().unwrap();
//!
//! assert_eq!(payload.get("dag_version_id"), Some(&FieldValue::Int(101)));
//! assert_eq!(TaskInstanceV11::SCHEMA_VERSION, "1.1");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod payload;
mod value;
mod version;

pub mod models;

// Re-exports
pub use models::{TaskInstanceV10, TaskInstanceV11, VersionedModel};
pub use payload::{Payload, PayloadError};
pub use value::FieldValue;
pub use version::SchemaVersion;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
