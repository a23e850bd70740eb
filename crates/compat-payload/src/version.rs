//! Schema version identifiers

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque schema version identifier (e.g. `"1.0"`, `"1.1"`)
///
/// Versions compare by exact string equality; `"1.0"` and `"1.00"` are
/// distinct versions. No ordering between versions is implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    /// Create from any string-like identifier
    #[inline]
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// Get as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchemaVersion {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SchemaVersion {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&SchemaVersion> for SchemaVersion {
    fn from(value: &SchemaVersion) -> Self {
        value.clone()
    }
}

impl AsRef<str> for SchemaVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SchemaVersion {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SchemaVersion {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SchemaVersion {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_string_equality() {
        assert_eq!(SchemaVersion::from("1.0"), SchemaVersion::new("1.0"));
        assert_ne!(SchemaVersion::from("1.0"), SchemaVersion::from("1.00"));
        assert_eq!(SchemaVersion::from("1.1"), "1.1");
    }

    #[test]
    fn display_is_raw_identifier() {
        assert_eq!(SchemaVersion::from("1.1").to_string(), "1.1");
    }

    #[test]
    fn serde_transparent() {
        let v: SchemaVersion = serde_json::from_str("\"2.0\"").unwrap();
        assert_eq!(v.as_str(), "2.0");
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"2.0\"");
    }
}
