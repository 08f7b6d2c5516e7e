//! # Unified Configuration System
//!
//! Configuration for the export and import paths and for logging, loadable
//! from TOML or RON through the [`Config`] trait.
//!
//! ## Configuration Categories
//!
//! - **Export Config**: envelope format and default item name
//! - **Import Config**: host object kind and failure policy
//! - **Logging Config**: default log level

use serde::{Serialize, Deserialize};

use crate::forest::decoder::{ErrorPolicy, ObjectKind};
use crate::forest::encoder::ForestFormat;
use crate::forest::error::ForestError;
use crate::foundation::logging;

pub use crate::config::{Config, ConfigError};

/// # Export Configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Envelope to write
    pub format: ForestFormat,
    /// Forest item name for records without their own; empty means the
    /// placeholder name is written
    pub type_tag: String,
}

impl ExportConfig {
    /// Create a new export configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: ForestFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the forest item name
    #[must_use]
    pub fn with_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = tag.into();
        self
    }
}

/// # Import Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Kind of host object created per item
    pub object_kind: ObjectKind,
    /// What to do with lines that cannot be decoded
    pub error_policy: ErrorPolicy,
}

impl ImportConfig {
    /// Create a new import configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host object kind
    #[must_use]
    pub const fn with_object_kind(mut self, kind: ObjectKind) -> Self {
        self.object_kind = kind;
        self
    }

    /// Set the failure policy
    #[must_use]
    pub const fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level; `RUST_LOG` overrides it
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// # Complete Forest Configuration
///
/// Top-level configuration the command-line host loads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Export settings
    pub export: ExportConfig,
    /// Import settings
    pub import: ImportConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl ForestConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ForestError> {
        if !logging::is_valid_level(&self.logging.level) {
            return Err(ForestError::InvalidConfiguration(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }
}

impl Config for ForestConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ForestConfig::default();

        assert_eq!(config.export.format, ForestFormat::V4);
        assert!(config.export.type_tag.is_empty());
        assert_eq!(config.import.object_kind, ObjectKind::Marker);
        assert_eq!(config.import.error_policy, ErrorPolicy::CollectAndReport);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: ForestConfig = toml::from_str(
            r#"
            [export]
            format = "v1"
            type_tag = "tree_oak"

            [import]
            error_policy = "fail_fast"
            "#,
        )
        .unwrap();

        assert_eq!(config.export.format, ForestFormat::V1);
        assert_eq!(config.export.type_tag, "tree_oak");
        assert_eq!(config.import.error_policy, ErrorPolicy::FailFast);
        assert_eq!(config.import.object_kind, ObjectKind::Marker);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ForestConfig::new();
        config.logging.level = "chatty".to_string();

        assert!(matches!(config.validate(), Err(ForestError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("forest.toml");
        let config = ForestConfig {
            export: ExportConfig::new().with_format(ForestFormat::V3).with_type_tag("rock"),
            import: ImportConfig::new().with_object_kind(ObjectKind::Instance),
            logging: LoggingConfig::default(),
        };

        config.save_to_file(&path).unwrap();
        let loaded = ForestConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_and_load_ron() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("forest.ron");
        let config = ForestConfig {
            import: ImportConfig::new().with_error_policy(ErrorPolicy::FailFast),
            ..ForestConfig::default()
        };

        config.save_to_file(&path).unwrap();
        assert_eq!(ForestConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("forest.yaml");

        assert!(matches!(
            ForestConfig::default().save_to_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
