//! Error types for the migration registry
//!
//! Both kinds reflect a fixed configuration gap. Re-invoking with the same
//! arguments fails the same way, so neither is retryable.

use compat_payload::SchemaVersion;

/// Migration registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersioningError {
    /// A rule for this exact ordered pair is already registered
    #[error("duplicate migration rule for {origin} -> {target}")]
    DuplicateRule {
        /// Origin of the rejected rule
        origin: SchemaVersion,
        /// Target of the rejected rule
        target: SchemaVersion,
    },

    /// No direct rule exists for the requested pair
    #[error("no migration rule from {origin} to {target}")]
    NoMigrationRule {
        /// Version the payload is in
        origin: SchemaVersion,
        /// Version that was requested
        target: SchemaVersion,
    },
}

impl VersioningError {
    /// Origin version named by the error
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &SchemaVersion {
        match self {
            Self::DuplicateRule { origin, .. } | Self::NoMigrationRule { origin, .. } => origin,
        }
    }

    /// Target version named by the error
    #[inline]
    #[must_use]
    pub fn target(&self) -> &SchemaVersion {
        match self {
            Self::DuplicateRule { target, .. } | Self::NoMigrationRule { target, .. } => target,
        }
    }

    /// Check if error is retryable (never)
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Check if error is a missing migration path
    #[inline]
    #[must_use]
    pub fn is_missing_rule(&self) -> bool {
        matches!(self, Self::NoMigrationRule { .. })
    }
}
