//! Payload container
//!
//! A [`Payload`] is one entity instance at some schema version, as a flat
//! mapping from field name to [`FieldValue`]. The version travels alongside
//! the payload, never inside it.

use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::value::FieldValue;

/// Field name to value mapping for one entity instance
///
/// Insertion order is kept for display only; equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    fields: IndexMap<String, FieldValue>,
}

impl Payload {
    /// Create empty payload
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Set a field, returning the previous value
    #[inline]
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Remove a field, returning its value
    #[inline]
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.shift_remove(field)
    }

    /// Check if a field is present (a null value counts as present)
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if payload has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in insertion order
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Copy of this payload without the given fields
    ///
    /// Fields that are not present are ignored.
    #[must_use]
    pub fn without<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = self.clone();
        for field in fields {
            out.fields.shift_remove(field.as_ref());
        }
        out
    }

    /// Copy of this payload with every field of `other` written over it
    #[must_use]
    pub fn overlay(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.extend(other.iter().map(|(k, v)| (k.to_string(), v.clone())));
        out
    }

    /// Build from a JSON object value
    ///
    /// # Errors
    /// Returns error if the value is not an object or a field holds an
    /// unsupported value
    pub fn from_json_value(value: JsonValue) -> Result<Self, PayloadError> {
        let map = match value {
            JsonValue::Object(map) => map,
            other => return Err(PayloadError::NotAnObject(json_kind(&other))),
        };

        let mut fields = IndexMap::with_capacity(map.len());
        for (field, raw) in map {
            let value = FieldValue::try_from(raw).map_err(|e| match e {
                PayloadError::UnsupportedValue(kind) => PayloadError::UnsupportedField {
                    field: field.clone(),
                    kind,
                },
                other => other,
            })?;
            fields.insert(field, value);
        }
        Ok(Self { fields })
    }

    /// Parse from JSON text
    ///
    /// # Errors
    /// Returns error if JSON is invalid or not a flat object of scalars
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Convert to a JSON object value
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        JsonValue::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), JsonValue::from(v.clone())))
                .collect(),
        )
    }

    /// Serialize to JSON text
    ///
    /// # Errors
    /// Returns error if serialization fails (rare for JSON)
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(&self.fields)?)
    }

    /// Create from a typed struct
    ///
    /// # Errors
    /// Returns error if the struct does not serialize to a flat object
    pub fn from_typed<T: Serialize>(value: &T) -> Result<Self, PayloadError> {
        Self::from_json_value(serde_json::to_value(value)?)
    }

    /// Convert to a typed struct
    ///
    /// # Errors
    /// Returns error if the fields do not match the type
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        Ok(serde_json::from_value(self.to_json_value())?)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> Extend<(K, V)> for Payload {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.fields.insert(k.into(), v.into());
        }
    }
}

impl IntoIterator for Payload {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl TryFrom<JsonValue> for Payload {
    type Error = PayloadError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_json_value(value)
    }
}

impl From<Payload> for JsonValue {
    fn from(payload: Payload) -> Self {
        payload.to_json_value()
    }
}

/// Payload conversion errors
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// Value kind with no [`FieldValue`] representation
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// Field holding a value kind with no [`FieldValue`] representation
    #[error("unsupported value for field '{field}': {kind}")]
    UnsupportedField { field: String, kind: String },

    /// Top-level value was not an object
    #[error("payload must be an object, got {0}")]
    NotAnObject(&'static str),

    /// JSON encode/decode failure
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server_payload() -> Payload {
        Payload::from_iter([
            ("task_id", FieldValue::from("t1")),
            ("retries", FieldValue::from(3)),
            ("owner", FieldValue::from("airflow")),
            ("dag_version_id", FieldValue::from(99)),
        ])
    }

    #[test]
    fn payload_insert_get_remove() {
        let mut p = Payload::new();
        assert!(p.is_empty());
        assert_eq!(p.insert("owner", "airflow"), None);
        assert_eq!(p.insert("owner", "dag_owner"), Some(FieldValue::from("airflow")));
        assert_eq!(p.get("owner").and_then(FieldValue::as_str), Some("dag_owner"));
        assert_eq!(p.remove("owner"), Some(FieldValue::from("dag_owner")));
        assert!(!p.contains("owner"));
    }

    #[test]
    fn null_counts_as_present() {
        let mut p = Payload::new();
        p.insert("dag_version_id", FieldValue::Null);
        assert!(p.contains("dag_version_id"));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn without_leaves_original_untouched() {
        let original = server_payload();
        let trimmed = original.without(["dag_version_id", "not_there"]);

        assert!(!trimmed.contains("dag_version_id"));
        assert_eq!(trimmed.len(), 3);
        assert!(original.contains("dag_version_id"));
        assert_eq!(original.len(), 4);
    }

    #[test]
    fn overlay_other_wins() {
        let base = Payload::from_iter([("retries", 1), ("priority", 5)]);
        let top = Payload::from_iter([("retries", 2)]);
        let merged = base.overlay(&top);

        assert_eq!(merged.get("retries"), Some(&FieldValue::Int(2)));
        assert_eq!(merged.get("priority"), Some(&FieldValue::Int(5)));
        assert_eq!(base.get("retries"), Some(&FieldValue::Int(1)));
    }

    #[test]
    fn equality_ignores_order() {
        let a = Payload::from_iter([("a", 1), ("b", 2)]);
        let b = Payload::from_iter([("b", 2), ("a", 1)]);
        assert_eq!(a, b);
    }

    #[test]
    fn field_names_keep_insertion_order() {
        let p = server_payload();
        assert_eq!(p.field_names(), vec!["task_id", "retries", "owner", "dag_version_id"]);
    }

    #[test]
    fn from_json_flat_object() {
        let p = Payload::from_json(r#"{"task_id": "x", "retries": 2, "dag_version_id": null}"#)
            .unwrap();
        assert_eq!(p.get("retries"), Some(&FieldValue::Int(2)));
        assert_eq!(p.get("dag_version_id"), Some(&FieldValue::Null));
    }

    #[test]
    fn from_json_rejects_nested_field() {
        let err = Payload::from_json(r#"{"task_id": "x", "tags": ["a"]}"#).unwrap_err();
        match err {
            PayloadError::UnsupportedField { field, kind } => {
                assert_eq!(field, "tags");
                assert_eq!(kind, "array");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_json_rejects_non_object() {
        let err = Payload::from_json_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, PayloadError::NotAnObject("array")));
    }

    #[test]
    fn json_value_round_trip() {
        let p = server_payload();
        let value = p.to_json_value();
        assert_eq!(value["dag_version_id"], json!(99));
        assert_eq!(Payload::try_from(value).unwrap(), p);
    }

    #[test]
    fn typed_conversion() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Probe {
            task_id: String,
            retries: i64,
            flag: Option<bool>,
        }

        let probe = Probe {
            task_id: "x".to_string(),
            retries: 4,
            flag: None,
        };
        let p = Payload::from_typed(&probe).unwrap();
        assert_eq!(p.get("flag"), Some(&FieldValue::Null));

        let back: Probe = p.to_typed().unwrap();
        assert_eq!(back, probe);
    }

    #[test]
    fn serializes_as_plain_object() {
        let p = Payload::from_iter([("task_id", "x")]);
        assert_eq!(p.to_json().unwrap(), r#"{"task_id":"x"}"#);
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"task_id":"x"}"#);
    }
}
