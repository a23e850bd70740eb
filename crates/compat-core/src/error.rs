//! Error types for the compatibility pipeline
//!
//! Lower-level errors are wrapped as-is. A missing downgrade rule under
//! [`MissingRulePolicy::Reject`](crate::MissingRulePolicy::Reject) becomes
//! [`CompatError::Incompatible`], the explicit compatibility failure a
//! service returns instead of a guessed payload.

use compat_payload::{PayloadError, SchemaVersion};
use compat_versioning::VersioningError;

use crate::config::ConfigError;

/// Main pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum CompatError {
    /// Client version cannot be served from the server version
    #[error("client version {client_version} is incompatible with server version {server_version}")]
    Incompatible {
        client_version: SchemaVersion,
        server_version: SchemaVersion,
        #[source]
        source: VersioningError,
    },

    /// Migration registry error
    #[error("versioning error: {0}")]
    Versioning(#[from] VersioningError),

    /// Payload conversion error
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CompatError {
    /// Check if error is a compatibility failure
    #[inline]
    #[must_use]
    pub fn is_incompatible(&self) -> bool {
        matches!(self, Self::Incompatible { .. })
    }

    /// Check if error is retryable
    ///
    /// Every kind reflects fixed configuration or input, so retrying the
    /// same request fails the same way.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn incompatible_keeps_source() {
        let err = CompatError::Incompatible {
            client_version: "0.9".into(),
            server_version: "1.1".into(),
            source: VersioningError::NoMigrationRule {
                origin: "1.1".into(),
                target: "0.9".into(),
            },
        };

        assert!(err.is_incompatible());
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "client version 0.9 is incompatible with server version 1.1"
        );
        assert_eq!(
            err.source().map(ToString::to_string),
            Some("no migration rule from 1.1 to 0.9".to_string())
        );
    }

    #[test]
    fn versioning_converts() {
        let err: CompatError = VersioningError::DuplicateRule {
            origin: "1.1".into(),
            target: "1.0".into(),
        }
        .into();
        assert!(matches!(err, CompatError::Versioning(_)));
        assert!(!err.is_incompatible());
    }
}
