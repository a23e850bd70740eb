//! Compatibility pipeline
//!
//! Chains the two independent components the way a server handling an
//! older client does: migrate the server payload down to the client's
//! version, then resolve defaults over the migrated payload.

use compat_defaults::{DefaultResolver, ResolvedPayload};
use compat_payload::{Payload, SchemaVersion, VersionedModel};
use compat_versioning::{MigrationRegistry, VersioningError};

use crate::config::{CompatConfig, MissingRulePolicy};
use crate::error::CompatError;

/// Migrate-then-resolve pipeline over a borrowed registry
///
/// The registry is passed in rather than global, so independent pipelines
/// (and registries) can coexist in one process.
#[derive(Debug, Clone)]
pub struct CompatPipeline<'r> {
    registry: &'r MigrationRegistry,
    resolver: DefaultResolver,
    config: CompatConfig,
}

impl<'r> CompatPipeline<'r> {
    /// Create pipeline; the resolver is built from `config.defaults`
    #[must_use]
    pub fn new(registry: &'r MigrationRegistry, config: CompatConfig) -> Self {
        let resolver = DefaultResolver::from_config(config.defaults.clone());
        Self {
            registry,
            resolver,
            config,
        }
    }

    /// Replace the resolver
    #[inline]
    #[must_use]
    pub fn with_resolver(mut self, resolver: DefaultResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CompatConfig {
        &self.config
    }

    /// Get resolver
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &DefaultResolver {
        &self.resolver
    }

    /// Get registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &'r MigrationRegistry {
        self.registry
    }

    /// Serve a server-version payload to a client
    ///
    /// # Errors
    /// - [`CompatError::Incompatible`] if no rule exists and the policy is
    ///   [`MissingRulePolicy::Reject`]
    pub fn serve(
        &self,
        payload: &Payload,
        client_version: impl AsRef<str>,
    ) -> Result<Payload, CompatError> {
        let migrated =
            self.migrate_for(payload, &self.config.server_version, client_version.as_ref())?;
        Ok(self.resolver.resolve(&migrated))
    }

    /// Serve a payload and report the source of each resolved field
    ///
    /// # Errors
    /// Same as [`serve`](Self::serve)
    pub fn serve_traced(
        &self,
        payload: &Payload,
        client_version: impl AsRef<str>,
    ) -> Result<ResolvedPayload, CompatError> {
        let migrated =
            self.migrate_for(payload, &self.config.server_version, client_version.as_ref())?;
        Ok(self.resolver.resolve_traced(&migrated))
    }

    /// Serve a typed model; its own schema version is the origin
    ///
    /// # Errors
    /// - [`CompatError::Payload`] if the model does not serialize flat
    /// - otherwise same as [`serve`](Self::serve)
    pub fn serve_model<M: VersionedModel>(
        &self,
        model: &M,
        client_version: impl AsRef<str>,
    ) -> Result<Payload, CompatError> {
        let payload = model.to_payload()?;
        let migrated = self.migrate_for(&payload, &M::schema_version(), client_version.as_ref())?;
        Ok(self.resolver.resolve(&migrated))
    }

    fn migrate_for(
        &self,
        payload: &Payload,
        server_version: &SchemaVersion,
        client_version: &str,
    ) -> Result<Payload, CompatError> {
        tracing::info!(server = %server_version, client = client_version, "serving payload");

        match self.registry.migrate(payload, server_version, client_version) {
            Ok(migrated) => Ok(migrated),
            Err(err @ VersioningError::NoMigrationRule { .. }) => match self.config.missing_rule {
                MissingRulePolicy::Reject => {
                    tracing::error!(
                        server = %server_version,
                        client = client_version,
                        "no downgrade path, rejecting request"
                    );
                    Err(CompatError::Incompatible {
                        client_version: SchemaVersion::from(client_version),
                        server_version: server_version.clone(),
                        source: err,
                    })
                }
                MissingRulePolicy::PassThrough => {
                    tracing::warn!(
                        server = %server_version,
                        client = client_version,
                        "no downgrade path, passing payload through unmigrated"
                    );
                    Ok(payload.clone())
                }
            },
            Err(err) => Err(err.into()),
        }
    }
}
