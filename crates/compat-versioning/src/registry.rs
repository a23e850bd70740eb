//! Migration registry
//!
//! Provides [`MigrationRegistry`] for storing version changes and applying
//! the one registered for an exact `(from, to)` pair.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use compat_payload::{Payload, SchemaVersion};

use crate::builtin;
use crate::change::{VersionChange, VersionPair};
use crate::error::VersioningError;

/// Registry of directional, one-hop migration rules
///
/// Rules are written during setup and only read afterwards. There is no
/// global instance: construct one and pass it by reference. Only directly
/// registered pairs are honored; `A -> C` is never derived from `A -> B`
/// and `B -> C`, and `B -> A` is never derived from `A -> B`.
#[derive(Debug, Default, Clone)]
pub struct MigrationRegistry {
    changes: HashMap<VersionPair, VersionChange>,
}

impl MigrationRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            changes: HashMap::new(),
        }
    }

    /// Create registry holding the built-in task-instance rules
    ///
    /// # Errors
    /// Returns error if the built-in set contains a duplicate pair
    pub fn with_builtin_rules() -> Result<Self, VersioningError> {
        let mut registry = Self::new();
        for change in builtin::task_instance_changes() {
            registry.register(change)?;
        }
        Ok(registry)
    }

    /// Register a change under its `(origin, target)` pair
    ///
    /// # Errors
    /// Returns [`VersioningError::DuplicateRule`] if the pair is already
    /// registered; the existing rule is kept.
    pub fn register(&mut self, change: VersionChange) -> Result<(), VersioningError> {
        let key = change.key().clone();

        if key.origin == key.target {
            tracing::warn!(
                version = %key.origin,
                "registering rule between a version and itself; migrate never consults it"
            );
        }

        match self.changes.entry(key) {
            Entry::Occupied(occupied) => {
                let key = occupied.key();
                tracing::debug!(rule = %key, "rejected duplicate migration rule");
                Err(VersioningError::DuplicateRule {
                    origin: key.origin.clone(),
                    target: key.target.clone(),
                })
            }
            Entry::Vacant(vacant) => {
                tracing::debug!(
                    rule = %vacant.key(),
                    description = change.description(),
                    "registered migration rule"
                );
                vacant.insert(change);
                Ok(())
            }
        }
    }

    /// Migrate a payload from one schema version to another
    ///
    /// Equal versions return the payload unchanged without a lookup.
    /// Otherwise the rule for exactly `(from, to)` is applied and its output
    /// returned as-is. The input is never modified.
    ///
    /// # Errors
    /// Returns [`VersioningError::NoMigrationRule`] if no direct rule exists
    pub fn migrate(
        &self,
        payload: &Payload,
        from_version: impl AsRef<str>,
        to_version: impl AsRef<str>,
    ) -> Result<Payload, VersioningError> {
        let (from, to) = (from_version.as_ref(), to_version.as_ref());

        if from == to {
            tracing::trace!(version = from, "same version, migration skipped");
            return Ok(payload.clone());
        }

        let key = VersionPair::new(from, to);
        let Some(change) = self.changes.get(&key) else {
            tracing::debug!(rule = %key, "no migration rule");
            return Err(VersioningError::NoMigrationRule {
                origin: key.origin,
                target: key.target,
            });
        };

        let migrated = change.apply(payload);
        tracing::debug!(
            rule = %key,
            fields_in = payload.len(),
            fields_out = migrated.len(),
            "applied migration rule"
        );
        Ok(migrated)
    }

    /// Check if a direct rule exists for `(from, to)`
    #[inline]
    #[must_use]
    pub fn contains(&self, from_version: impl AsRef<str>, to_version: impl AsRef<str>) -> bool {
        self.get(from_version, to_version).is_some()
    }

    /// Get the rule registered for `(from, to)`
    #[must_use]
    pub fn get(
        &self,
        from_version: impl AsRef<str>,
        to_version: impl AsRef<str>,
    ) -> Option<&VersionChange> {
        self.changes
            .get(&VersionPair::new(from_version.as_ref(), to_version.as_ref()))
    }

    /// Get number of registered rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// All registered rules, sorted by `(origin, target)`
    #[must_use]
    pub fn changes(&self) -> Vec<&VersionChange> {
        let mut changes: Vec<_> = self.changes.values().collect();
        changes.sort_by(|a, b| a.key().cmp(b.key()));
        changes
    }

    /// Versions directly reachable from `version`, sorted
    #[must_use]
    pub fn targets_from(&self, version: impl AsRef<str>) -> Vec<&SchemaVersion> {
        let version = version.as_ref();
        let mut targets: Vec<_> = self
            .changes
            .keys()
            .filter(|key| key.origin == version)
            .map(|key| &key.target)
            .collect();
        targets.sort();
        targets
    }
}
