//! Reusable transforms
//!
//! Building blocks for the common shape changes between schema versions:
//! a field disappears, a field is renamed, a field appears with a default.

use compat_payload::{FieldValue, Payload};

/// Remove the named fields (downgrade past the version that added them)
pub fn drop_fields<I, S>(fields: I) -> impl Fn(&Payload) -> Payload + Send + Sync + Clone
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    move |payload: &Payload| payload.without(&fields)
}

/// Move the value of `from` to `to`, overwriting any value under `to`
///
/// Payloads without `from` pass through unchanged.
pub fn rename_field(
    from: impl Into<String>,
    to: impl Into<String>,
) -> impl Fn(&Payload) -> Payload + Send + Sync + Clone {
    let from = from.into();
    let to = to.into();
    move |payload: &Payload| {
        let mut out = payload.clone();
        if let Some(value) = out.remove(&from) {
            out.insert(to.clone(), value);
        }
        out
    }
}

/// Add `field` with `value` when the payload does not carry it
///
/// An existing value, null included, is kept.
pub fn insert_default(
    field: impl Into<String>,
    value: impl Into<FieldValue>,
) -> impl Fn(&Payload) -> Payload + Send + Sync + Clone {
    let field = field.into();
    let value = value.into();
    move |payload: &Payload| {
        let mut out = payload.clone();
        if !out.contains(&field) {
            out.insert(field.clone(), value.clone());
        }
        out
    }
}
