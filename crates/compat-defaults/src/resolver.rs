//! Default resolver
//!
//! Merges the four default layers and the explicit task values under one
//! law:
//!
//! ```text
//! schema < client < dag < partial < explicit task values
//! ```
//!
//! Each field takes its value from the highest-precedence source that
//! defines it. A field defined nowhere is absent from the result.

use compat_payload::{FieldValue, Payload};
use indexmap::IndexMap;

use crate::config::DefaultsConfig;
use crate::layer::{DefaultLayer, FieldSource, LayerKind};

/// Immutable set of default layers
///
/// `resolve` only reads the stored layers, so one resolver can be shared
/// across threads without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultResolver {
    layers: [DefaultLayer; 4],
}

impl DefaultResolver {
    /// Create resolver from the four layers
    #[must_use]
    pub fn new(
        schema_defaults: Payload,
        client_defaults: Payload,
        dag_defaults: Payload,
        partial_args: Payload,
    ) -> Self {
        Self {
            layers: [
                DefaultLayer::new(LayerKind::Schema, schema_defaults),
                DefaultLayer::new(LayerKind::Client, client_defaults),
                DefaultLayer::new(LayerKind::Dag, dag_defaults),
                DefaultLayer::new(LayerKind::Partial, partial_args),
            ],
        }
    }

    /// Create resolver from configuration
    #[must_use]
    pub fn from_config(config: DefaultsConfig) -> Self {
        Self::new(config.schema, config.client, config.dag, config.partial)
    }

    /// Replace one layer
    #[inline]
    #[must_use]
    pub fn with_layer(mut self, kind: LayerKind, values: Payload) -> Self {
        self.layers[kind.index()] = DefaultLayer::new(kind, values);
        self
    }

    /// Get one layer's values
    #[inline]
    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> &Payload {
        &self.layers[kind.index()].values
    }

    /// Layers, lowest precedence first
    pub fn layers(&self) -> impl Iterator<Item = &DefaultLayer> {
        self.layers.iter()
    }

    /// Resolve final field values for one entity
    ///
    /// Never fails; values pass through without coercion or validation.
    #[must_use]
    pub fn resolve(&self, task_values: &Payload) -> Payload {
        let mut merged = Payload::new();
        for layer in &self.layers {
            tracing::trace!(
                layer = %layer.kind,
                fields = layer.values.len(),
                "merging default layer"
            );
            merged.extend(layer.values.iter().map(|(k, v)| (k, v.clone())));
        }
        merged.extend(task_values.iter().map(|(k, v)| (k, v.clone())));

        tracing::debug!(
            explicit = task_values.len(),
            resolved = merged.len(),
            "resolved defaults"
        );
        merged
    }

    /// Resolve and report which source supplied each field
    #[must_use]
    pub fn resolve_traced(&self, task_values: &Payload) -> ResolvedPayload {
        let mut values = Payload::new();
        let mut sources = IndexMap::new();

        let layered = self
            .layers
            .iter()
            .map(|layer| (FieldSource::Layer(layer.kind), &layer.values));
        let explicit = std::iter::once((FieldSource::Explicit, task_values));

        for (source, payload) in layered.chain(explicit) {
            for (field, value) in payload.iter() {
                values.insert(field, value.clone());
                sources.insert(field.to_string(), source);
            }
        }

        ResolvedPayload { values, sources }
    }
}

impl Default for DefaultResolver {
    fn default() -> Self {
        Self::new(Payload::new(), Payload::new(), Payload::new(), Payload::new())
    }
}

impl From<DefaultsConfig> for DefaultResolver {
    fn from(config: DefaultsConfig) -> Self {
        Self::from_config(config)
    }
}

/// Resolved payload with per-field provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPayload {
    /// Final field values
    pub values: Payload,
    /// Winning source per field
    pub sources: IndexMap<String, FieldSource>,
}

impl ResolvedPayload {
    /// Source that supplied `field`
    #[inline]
    #[must_use]
    pub fn source_of(&self, field: &str) -> Option<FieldSource> {
        self.sources.get(field).copied()
    }

    /// Resolved value of `field`
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Fields supplied by the given source
    #[must_use]
    pub fn fields_from(&self, source: FieldSource) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|(_, s)| **s == source)
            .map(|(f, _)| f.as_str())
            .collect()
    }
}
