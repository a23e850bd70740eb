//! Pipeline configuration
//!
//! A [`CompatConfig`] names the version the server produces, what to do when
//! no downgrade rule exists, and the default layers. It loads from TOML,
//! YAML or JSON:
//!
//! ```toml
//! server_version = "1.1"
//! missing_rule = "reject"
//!
//! [defaults.schema]
//! retries = 1
//! owner = "airflow"
//!
//! [defaults.partial]
//! owner = "dag_owner"
//! ```

use std::path::{Path, PathBuf};

use compat_defaults::DefaultsConfig;
use compat_payload::{SchemaVersion, TaskInstanceV11, VersionedModel};
use serde::{Deserialize, Serialize};

/// What the pipeline does when no direct rule serves a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRulePolicy {
    /// Fail the request with a compatibility error
    #[default]
    Reject,
    /// Log a warning and resolve the unmigrated payload
    PassThrough,
}

/// Compatibility pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompatConfig {
    /// Schema version of payloads the server produces
    #[serde(default = "default_server_version")]
    pub server_version: SchemaVersion,
    /// Missing downgrade rule handling
    #[serde(default)]
    pub missing_rule: MissingRulePolicy,
    /// Default layers applied after migration
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

fn default_server_version() -> SchemaVersion {
    TaskInstanceV11::schema_version()
}

impl CompatConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With server version
    #[inline]
    #[must_use]
    pub fn with_server_version(mut self, version: impl Into<SchemaVersion>) -> Self {
        self.server_version = version.into();
        self
    }

    /// With missing-rule policy
    #[inline]
    #[must_use]
    pub fn with_missing_rule(mut self, policy: MissingRulePolicy) -> Self {
        self.missing_rule = policy;
        self
    }

    /// With default layers
    #[inline]
    #[must_use]
    pub fn with_defaults(mut self, defaults: DefaultsConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns error if TOML is invalid or does not match the schema
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Parse from YAML text
    ///
    /// # Errors
    /// Returns error if YAML is invalid or does not match the schema
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse from JSON text
    ///
    /// # Errors
    /// Returns error if JSON is invalid or does not match the schema
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse text in the given format
    ///
    /// # Errors
    /// Returns error if the text does not parse as `format`
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => Self::from_toml_str(text),
            ConfigFormat::Yaml => Self::from_yaml_str(text),
            ConfigFormat::Json => Self::from_json_str(text),
        }
    }

    /// Load from a file, picking the format by extension
    ///
    /// # Errors
    /// Returns error if the extension is unknown, the file cannot be read,
    /// or its content does not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), ?format, "loading compat config");
        Self::parse(&text, format)
    }
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            server_version: default_server_version(),
            missing_rule: MissingRulePolicy::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    ///
    /// # Errors
    /// Returns error for missing or unrecognised extensions
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid TOML: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown config format for {0} (expected .toml, .yaml, .yml or .json)")]
    UnknownFormat(PathBuf),
}
