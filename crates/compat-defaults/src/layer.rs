//! Default layers and value sources

use std::fmt;

use compat_payload::Payload;
use serde::{Deserialize, Serialize};

/// Named default layer, declared in ascending precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Model/server-schema defaults (lowest)
    Schema,
    /// Caller/SDK defaults
    Client,
    /// Workflow-level defaults
    Dag,
    /// Explicit overrides shared across a batch of related instances
    Partial,
}

impl LayerKind {
    /// All layers, lowest precedence first
    pub const ALL: [LayerKind; 4] = [Self::Schema, Self::Client, Self::Dag, Self::Partial];

    /// Position in the precedence order
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Schema => 0,
            Self::Client => 1,
            Self::Dag => 2,
            Self::Partial => 3,
        }
    }

    /// Layer name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Client => "client",
            Self::Dag => "dag",
            Self::Partial => "partial",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One named source of fallback values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultLayer {
    pub kind: LayerKind,
    pub values: Payload,
}

impl DefaultLayer {
    /// Create layer
    #[inline]
    #[must_use]
    pub fn new(kind: LayerKind, values: Payload) -> Self {
        Self { kind, values }
    }

    /// Create layer with no values
    #[inline]
    #[must_use]
    pub fn empty(kind: LayerKind) -> Self {
        Self::new(kind, Payload::new())
    }
}

/// Where a resolved field value came from
///
/// Ordered by precedence: every layer ranks below explicit task values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Supplied by a default layer
    Layer(LayerKind),
    /// Set directly on the entity
    Explicit,
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layer(kind) => write!(f, "{kind}"),
            Self::Explicit => write!(f, "explicit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_order_ascending() {
        assert!(LayerKind::Schema < LayerKind::Client);
        assert!(LayerKind::Client < LayerKind::Dag);
        assert!(LayerKind::Dag < LayerKind::Partial);
        for (i, kind) in LayerKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn explicit_outranks_every_layer() {
        for kind in LayerKind::ALL {
            assert!(FieldSource::Layer(kind) < FieldSource::Explicit);
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(LayerKind::Partial.to_string(), "partial");
        assert_eq!(FieldSource::Layer(LayerKind::Dag).to_string(), "dag");
        assert_eq!(FieldSource::Explicit.to_string(), "explicit");
    }

    #[test]
    fn empty_layer() {
        let layer = DefaultLayer::empty(LayerKind::Client);
        assert!(layer.values.is_empty());
        assert_eq!(layer.kind, LayerKind::Client);
    }
}
