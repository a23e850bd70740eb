//! Default layer configuration
//!
//! Serde shape of the four layers, e.g. in TOML:
//!
//! ```toml
//! [schema]
//! retries = 1
//! owner = "airflow"
//!
//! [dag]
//! retries = 2
//! ```
//!
//! Every layer is optional and defaults to empty.

use compat_payload::Payload;
use serde::{Deserialize, Serialize};

use crate::layer::LayerKind;

/// Values for the four default layers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub schema: Payload,
    pub client: Payload,
    pub dag: Payload,
    pub partial: Payload,
}

impl DefaultsConfig {
    /// Create empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one layer
    #[must_use]
    pub fn with_layer(mut self, kind: LayerKind, values: Payload) -> Self {
        *self.layer_mut(kind) = values;
        self
    }

    /// Get one layer
    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> &Payload {
        match kind {
            LayerKind::Schema => &self.schema,
            LayerKind::Client => &self.client,
            LayerKind::Dag => &self.dag,
            LayerKind::Partial => &self.partial,
        }
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut Payload {
        match kind {
            LayerKind::Schema => &mut self.schema,
            LayerKind::Client => &mut self.client,
            LayerKind::Dag => &mut self.dag,
            LayerKind::Partial => &mut self.partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compat_payload::FieldValue;

    #[test]
    fn deserialize_partial_config() {
        let config: DefaultsConfig =
            serde_json::from_str(r#"{"schema": {"retries": 1}, "dag": {"retries": 2}}"#).unwrap();

        assert_eq!(config.schema.get("retries"), Some(&FieldValue::Int(1)));
        assert!(config.client.is_empty());
        assert!(config.partial.is_empty());
    }

    #[test]
    fn unknown_layer_rejected() {
        let result: Result<DefaultsConfig, _> = serde_json::from_str(r#"{"global": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn nested_value_rejected() {
        let result: Result<DefaultsConfig, _> =
            serde_json::from_str(r#"{"schema": {"tags": ["a"]}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn with_layer_and_get() {
        let config = DefaultsConfig::new()
            .with_layer(LayerKind::Client, Payload::from_iter([("owner", "sdk_client")]));
        assert_eq!(
            config.layer(LayerKind::Client).get("owner"),
            Some(&FieldValue::from("sdk_client"))
        );
    }
}
