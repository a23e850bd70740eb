//! Lock-guarded registry handle
//!
//! For processes that cannot finish registration before serving: writers
//! take the exclusive lock, migrations share the read lock.

use std::sync::Arc;

use compat_payload::Payload;
use parking_lot::RwLock;

use crate::change::VersionChange;
use crate::error::VersioningError;
use crate::registry::MigrationRegistry;

/// Cloneable, thread-safe handle to a [`MigrationRegistry`]
#[derive(Debug, Default, Clone)]
pub struct SharedMigrationRegistry {
    inner: Arc<RwLock<MigrationRegistry>>,
}

impl SharedMigrationRegistry {
    /// Create handle over an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change under the write lock
    ///
    /// # Errors
    /// Returns [`VersioningError::DuplicateRule`] if the pair is taken
    pub fn register(&self, change: VersionChange) -> Result<(), VersioningError> {
        self.inner.write().register(change)
    }

    /// Migrate under the read lock
    ///
    /// # Errors
    /// Returns [`VersioningError::NoMigrationRule`] if no direct rule exists
    pub fn migrate(
        &self,
        payload: &Payload,
        from_version: impl AsRef<str>,
        to_version: impl AsRef<str>,
    ) -> Result<Payload, VersioningError> {
        self.inner.read().migrate(payload, from_version, to_version)
    }

    /// Check if a direct rule exists
    #[inline]
    #[must_use]
    pub fn contains(&self, from_version: impl AsRef<str>, to_version: impl AsRef<str>) -> bool {
        self.inner.read().contains(from_version, to_version)
    }

    /// Get number of registered rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Point-in-time copy of the registry
    #[must_use]
    pub fn snapshot(&self) -> MigrationRegistry {
        self.inner.read().clone()
    }
}

impl From<MigrationRegistry> for SharedMigrationRegistry {
    fn from(registry: MigrationRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }
}
