//! Rule configuration file.
//!
//! Lets a deployment append its own categories to the standard catalog, or
//! replace it entirely, without recompiling. The file is read once at startup;
//! the resulting catalog is immutable.

use crate::error::ConfigError;
use crate::{CatalogBuilder, PatternCatalog};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version for the rules file.
pub const RULES_SCHEMA_VERSION: &str = "1.0.0";

/// Declarative catalog definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedactionConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Start from the standard rules.
    #[serde(default = "default_true")]
    pub include_standard: bool,

    /// Compiled-size cap per pattern, in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<usize>,

    /// Extra rules, appended in order after the standard ones.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

fn default_schema_version() -> String {
    RULES_SCHEMA_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

/// One `(category, pattern)` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub category: String,
    pub pattern: String,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            include_standard: true,
            size_limit: None,
            rules: Vec::new(),
        }
    }
}

impl RedactionConfig {
    /// Load from a `.json` file, or TOML for any other extension.
    ///
    /// The rules are compiled as part of loading so a bad pattern fails here,
    /// at startup.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config: RedactionConfig = if is_json {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the schema version and that the rules compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version.split('.').next() != RULES_SCHEMA_VERSION.split('.').next() {
            return Err(ConfigError::UnsupportedVersion {
                found: self.schema_version.clone(),
                expected: RULES_SCHEMA_VERSION,
            });
        }
        self.build_catalog()?;
        Ok(())
    }

    /// Compile the configured catalog.
    pub fn build_catalog(&self) -> crate::Result<PatternCatalog> {
        let mut builder = CatalogBuilder::new();
        if self.include_standard {
            builder = builder.with_standard_rules();
        }
        if let Some(limit) = self.size_limit {
            builder = builder.size_limit(limit);
        }
        builder
            .rules(self.rules.iter().map(|r| (&r.category, &r.pattern)))
            .build()
    }
}
