//! Main redaction engine.
//!
//! The engine walks the catalog in declaration order. Each rule scans the
//! output of the previous rule and replaces every non-overlapping match with
//! its placeholder, so a span consumed by an earlier rule is never seen again.
//! There is no error path: a rule that matches nothing contributes nothing.
//!
//! A later rule's placeholder can complete an earlier keyword rule
//! (`password=token = ...` becomes `password=[REDACTED_TOKEN]`), so the walk
//! repeats until the text stops changing, at most `catalog.len() + 1` times.
//! Output is therefore stable under a second redaction.

use crate::{PatternCatalog, Result};
use regex::NoExpand;
use std::borrow::Cow;
use std::fmt::Display;
use std::sync::Arc;

/// Stateless redaction over a shared, immutable catalog.
///
/// Cloning is cheap; clones share the compiled catalog and may be used from
/// any number of threads at once.
#[derive(Debug, Clone)]
pub struct RedactionEngine {
    catalog: Arc<PatternCatalog>,
}

impl RedactionEngine {
    /// Create an engine over an already-built catalog.
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Create an engine over the standard catalog.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(Arc::new(PatternCatalog::standard()?)))
    }

    /// The catalog this engine applies.
    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Redact `text`, returning an owned string.
    pub fn redact(&self, text: &str) -> String {
        self.redact_cow(text).into_owned()
    }

    /// Redact `text`, borrowing it back unchanged when nothing matched.
    pub fn redact_cow<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut current = Cow::Borrowed(text);

        for _ in 0..=self.catalog.len() {
            match self.apply_catalog(&current) {
                Some(next) => current = Cow::Owned(next),
                None => break,
            }
        }

        current
    }

    /// One ordered walk over the catalog. `None` when the text is unchanged.
    fn apply_catalog(&self, text: &str) -> Option<String> {
        let mut current = Cow::Borrowed(text);

        for rule in self.catalog.iter() {
            let replaced = match rule
                .matcher()
                .replace_all(&current, NoExpand(rule.placeholder()))
            {
                Cow::Borrowed(_) => continue,
                Cow::Owned(s) => s,
            };
            current = Cow::Owned(replaced);
        }

        match current {
            Cow::Owned(s) if s != text => Some(s),
            _ => None,
        }
    }

    /// Coerce any displayable value to text, then redact it.
    ///
    /// The original value is not recoverable from the result.
    pub fn redact_value<T: Display + ?Sized>(&self, value: &T) -> String {
        self.redact(&value.to_string())
    }

    /// Coerce a JSON value to text, then redact it.
    ///
    /// Strings are scanned as-is; every other value is scanned in its JSON
    /// text form.
    pub fn redact_json(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => self.redact(s),
            other => self.redact(&other.to_string()),
        }
    }
}
