//! Sensitive-data redaction for log messages.
//!
//! This crate provides the redaction stage that sits in front of every log
//! sink: an ordered catalog of detection rules, an engine that applies them,
//! and a filter adapter a logging pipeline can register.
//!
//! # Key Features
//!
//! - **Ordered catalog**: rules run in declaration order; earlier rules shadow
//!   later ones on overlapping spans.
//! - **Category placeholders**: every match becomes `[REDACTED_<CATEGORY>]`.
//! - **Infallible at call time**: a built catalog never errors. Bad patterns
//!   fail once, at startup, with [`CatalogBuildError`].
//! - **Lock-free sharing**: the compiled catalog is immutable and shared via
//!   `Arc` across threads.
//!
//! # Example
//!
//! ```
//! use scrub_redact::{LogRecord, RecordFilter, RedactionEngine, RedactionFilter};
//!
//! let engine = RedactionEngine::standard().unwrap();
//! assert_eq!(
//!     engine.redact("card 4532-1234-5678-9010"),
//!     "card [REDACTED_CREDIT_CARD]"
//! );
//!
//! let filter = RedactionFilter::new(engine);
//! let mut record = LogRecord::new("info", "billing", "contact user@example.com");
//! assert!(filter.filter(&mut record));
//! assert_eq!(record.message_str(), Some("contact [REDACTED_EMAIL]"));
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;

pub use catalog::{
    placeholder_for, CatalogBuilder, DetectionRule, PatternCatalog, PLACEHOLDER_PREFIX,
    STANDARD_RULES,
};
pub use config::{RedactionConfig, RuleSpec, RULES_SCHEMA_VERSION};
pub use engine::RedactionEngine;
pub use error::{CatalogBuildError, ConfigError, Result};
pub use filter::{LogRecord, RecordFilter, RedactionFilter};
