//! Error types for catalog construction and rule loading.
//!
//! Redaction itself has no error type: once a catalog is built, every call
//! succeeds. Everything here is a startup-time failure.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog construction.
pub type Result<T> = std::result::Result<T, CatalogBuildError>;

/// Errors that can occur while building a [`PatternCatalog`](crate::PatternCatalog).
#[derive(Error, Debug)]
pub enum CatalogBuildError {
    /// A rule's pattern failed to compile.
    #[error("invalid pattern for category '{category}': {source}")]
    InvalidPattern {
        category: String,
        #[source]
        source: regex::Error,
    },

    /// Two rules share the same category key.
    #[error("duplicate category '{category}'")]
    DuplicateCategory { category: String },

    /// Category key is empty or contains characters outside `[A-Za-z0-9_]`.
    #[error("invalid category key '{category}' (expected ASCII letters, digits or '_')")]
    InvalidCategory { category: String },
}

/// Errors that can occur while loading a rule configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// JSON parse error.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file declares a schema version this build does not understand.
    #[error("unsupported rules schema version '{found}' (expected {expected})")]
    UnsupportedVersion { found: String, expected: &'static str },

    /// The rules parsed but do not form a valid catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogBuildError),
}
