//! Compat Defaults
//!
//! Layered default resolution for entity fields.
//!
//! # Precedence
//!
//! | rank | source |
//! |---|---|
//! | 1 (lowest) | `schema` defaults |
//! | 2 | `client` defaults |
//! | 3 | `dag` defaults |
//! | 4 | `partial` args |
//! | 5 (highest) | explicit task values |
//!
//! # Example
//!
//! ```rust
//! use compat_defaults::DefaultResolver;
//! use compat_payload::{FieldValue, Payload};
//!
//! let resolver = DefaultResolver::new(
//!     Payload::from_iter([("retries", FieldValue::from(1)), ("owner", FieldValue::from("airflow"))]),
//!     Payload::from_iter([("owner", "sdk_client")]),
//!     Payload::from_iter([("retries", 2)]),
//!     Payload::from_iter([("owner", "dag_owner")]),
//! );
//!
//! let out = resolver.resolve(&Payload::from_iter([("task_id", "x")]));
//! assert_eq!(out.get("owner"), Some(&FieldValue::from("dag_owner")));
//! assert_eq!(out.get("retries"), Some(&FieldValue::Int(2)));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod layer;
mod resolver;

// Re-exports
pub use config::DefaultsConfig;
pub use layer::{DefaultLayer, FieldSource, LayerKind};
pub use resolver::{DefaultResolver, ResolvedPayload};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
