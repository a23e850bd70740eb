//! Compat Versioning
//!
//! Directional payload migrations between schema versions.
//!
//! # Core Concepts
//!
//! - [`VersionChange`]: One rule from an origin version to a target version
//! - [`PayloadTransform`]: The pure `Payload -> Payload` function a rule runs
//! - [`MigrationRegistry`]: Rules keyed by exact `(origin, target)` pair
//! - [`SharedMigrationRegistry`]: Lock-guarded handle for concurrent setup
//!
//! Rules are one-hop only. A registered `1.1 -> 1.0` does not provide
//! `1.0 -> 1.1`, and `1.2 -> 1.1` plus `1.1 -> 1.0` does not provide
//! `1.2 -> 1.0`.
//!
//! # Example
//!
//! ```rust
//! use compat_payload::Payload;
//! use compat_versioning::{transforms, MigrationRegistry, VersionChange};
//!
//! let mut registry = MigrationRegistry::new();
//! registry.register(VersionChange::new(
//!     "1.1",
//!     "1.0",
//!     "Remove dag_version_id for backward compatibility",
//!     transforms::drop_fields(["dag_version_id"]),
//! ))?;
//!
//! let server = Payload::from_iter([("task_id", 1), ("dag_version_id", 99)]);
//! let client = registry.migrate(&server, "1.1", "1.0")?;
//! assert!(!client.contains("dag_version_id"));
//! # Ok::<(), compat_versioning::VersioningError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod change;
mod error;
mod registry;
mod shared;

pub mod builtin;
pub mod transforms;

// Re-exports
pub use change::{PayloadTransform, VersionChange, VersionPair};
pub use error::VersioningError;
pub use registry::MigrationRegistry;
pub use shared::SharedMigrationRegistry;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
