//! Version changes
//!
//! A [`VersionChange`] is one directional rule between exactly two schema
//! versions. Registering `A -> B` says nothing about `B -> A`.

use std::fmt;
use std::sync::Arc;

use compat_payload::{Payload, SchemaVersion};

/// Transformation applied to a payload of the origin version's shape
///
/// Implement this for stateful transforms; plain closures
/// `Fn(&Payload) -> Payload` get it for free. The input is borrowed, so a
/// transform always builds a new payload.
pub trait PayloadTransform: Send + Sync {
    /// Produce the target-version payload
    fn apply(&self, payload: &Payload) -> Payload;
}

impl<F> PayloadTransform for F
where
    F: Fn(&Payload) -> Payload + Send + Sync,
{
    #[inline]
    fn apply(&self, payload: &Payload) -> Payload {
        self(payload)
    }
}

/// Ordered `(origin, target)` registry key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionPair {
    /// Version the rule reads
    pub origin: SchemaVersion,
    /// Version the rule produces
    pub target: SchemaVersion,
}

impl VersionPair {
    /// Create key for `origin -> target`
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<SchemaVersion>, target: impl Into<SchemaVersion>) -> Self {
        Self {
            origin: origin.into(),
            target: target.into(),
        }
    }

    /// Same pair, other direction
    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.target.clone(),
            target: self.origin.clone(),
        }
    }
}

impl fmt::Display for VersionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.target)
    }
}

/// One registered migration rule
///
/// Immutable after construction. Cloning shares the transform.
#[derive(Clone)]
pub struct VersionChange {
    key: VersionPair,
    description: String,
    transform: Arc<dyn PayloadTransform>,
}

impl VersionChange {
    /// Create a rule migrating `origin` payloads to `target`
    pub fn new(
        origin: impl Into<SchemaVersion>,
        target: impl Into<SchemaVersion>,
        description: impl Into<String>,
        transform: impl PayloadTransform + 'static,
    ) -> Self {
        Self {
            key: VersionPair::new(origin, target),
            description: description.into(),
            transform: Arc::new(transform),
        }
    }

    /// Version the input payload is shaped for
    #[inline]
    #[must_use]
    pub fn origin_version(&self) -> &SchemaVersion {
        &self.key.origin
    }

    /// Version the output payload is shaped for
    #[inline]
    #[must_use]
    pub fn target_version(&self) -> &SchemaVersion {
        &self.key.target
    }

    /// Human-readable description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Registry key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &VersionPair {
        &self.key
    }

    /// Run the transform
    #[inline]
    #[must_use]
    pub fn apply(&self, payload: &Payload) -> Payload {
        self.transform.apply(payload)
    }
}

impl fmt::Debug for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionChange")
            .field("origin", &self.key.origin)
            .field("target", &self.key.target)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
