//! Compat Core - Compatibility Pipeline
//!
//! Serves server-version payloads to clients on other schema versions:
//! - Migrates the payload with a directly registered rule
//! - Rejects (or passes through) requests with no downgrade path
//! - Resolves default layers over the migrated payload
//!
//! # Example
//!
//! ```rust
//! use compat_core::{demo, CompatPipeline};
//! use compat_payload::TaskInstanceV11;
//! use compat_versioning::MigrationRegistry;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = MigrationRegistry::with_builtin_rules()?;
//! let pipeline = CompatPipeline::new(&registry, demo::demo_config());
//!
//! let ti = TaskInstanceV11::new("transform_users").with_dag_version_id(101);
//! let response = pipeline.serve_model(&ti, "1.0")?;
//! assert!(!response.contains("dag_version_id"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod demo;
pub mod error;
pub mod pipeline;

// Re-exports for convenience
pub use config::{CompatConfig, ConfigError, ConfigFormat, MissingRulePolicy};
pub use error::CompatError;
pub use pipeline::CompatPipeline;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the compatibility pipeline
    pub use crate::{CompatConfig, CompatError, CompatPipeline, MissingRulePolicy};
    pub use compat_defaults::{DefaultResolver, DefaultsConfig, FieldSource, LayerKind};
    pub use compat_payload::{FieldValue, Payload, SchemaVersion, VersionedModel};
    pub use compat_versioning::{MigrationRegistry, VersionChange, VersioningError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
