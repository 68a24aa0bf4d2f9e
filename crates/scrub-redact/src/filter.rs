//! Log-record filter stage.
//!
//! A logging pipeline hands every record to its registered filters before
//! formatting. A filter may rewrite the record and returns whether to keep it.
//! [`RedactionFilter`] rewrites the message and always keeps the record.

use crate::RedactionEngine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A log record as seen by filter stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity, lower-case (`"info"`, `"warn"`, ...).
    pub level: String,

    /// Origin of the record (module path or event name).
    pub target: String,

    /// The message. May be any value until a filter coerces it to text.
    pub message: Value,

    /// Structured fields attached to the record.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl LogRecord {
    /// Create a record with a text message and no attributes.
    pub fn new(level: impl Into<String>, target: impl Into<String>, message: impl Into<Value>) -> Self {
        Self {
            level: level.into(),
            target: target.into(),
            message: message.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attach a structured field.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The message as text, if it is text.
    pub fn message_str(&self) -> Option<&str> {
        self.message.as_str()
    }
}

/// A pipeline stage that may transform a record and decides whether to keep it.
pub trait RecordFilter: Send + Sync {
    /// Inspect and possibly rewrite `record`. Returns `true` to keep it.
    fn filter(&self, record: &mut LogRecord) -> bool;
}

impl<F> RecordFilter for F
where
    F: Fn(&mut LogRecord) -> bool + Send + Sync,
{
    fn filter(&self, record: &mut LogRecord) -> bool {
        self(record)
    }
}

/// Filter stage that redacts the message of every record.
///
/// Never drops a record and never reports whether anything was redacted.
#[derive(Debug, Clone)]
pub struct RedactionFilter {
    engine: RedactionEngine,
}

impl RedactionFilter {
    pub fn new(engine: RedactionEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &RedactionEngine {
        &self.engine
    }
}

impl RecordFilter for RedactionFilter {
    fn filter(&self, record: &mut LogRecord) -> bool {
        let redacted = self.engine.redact_json(&record.message);
        record.message = Value::String(redacted);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_filter() -> RedactionFilter {
        RedactionFilter::new(RedactionEngine::standard().unwrap())
    }

    #[test]
    fn test_filter_redacts_message() {
        let filter = test_filter();
        let mut record = LogRecord::new("info", "app", "ssn 123-45-6789 on file");

        assert!(filter.filter(&mut record));
        assert_eq!(record.message_str(), Some("ssn [REDACTED_SSN] on file"));
    }

    #[test]
    fn test_filter_keeps_clean_record() {
        let filter = test_filter();
        let mut record = LogRecord::new("debug", "app", "nothing to see");

        assert!(filter.filter(&mut record));
        assert_eq!(record.message_str(), Some("nothing to see"));
    }

    #[test]
    fn test_filter_coerces_non_text_message() {
        let filter = test_filter();
        let mut record = LogRecord::new("info", "app", json!({"user": "user@example.com"}));

        assert!(filter.filter(&mut record));
        assert_eq!(
            record.message,
            Value::String(r#"{"user":"[REDACTED_EMAIL]"}"#.to_string())
        );
    }

    #[test]
    fn test_filter_matches_its_engine() {
        let filter = test_filter();
        let message = json!(["token=abcdefghij0123456789klmn", 7]);
        let expected = filter.engine().redact_json(&message);

        let mut record = LogRecord::new("info", "app", message);
        filter.filter(&mut record);
        assert_eq!(record.message_str(), Some(expected.as_str()));
        assert!(expected.contains("[REDACTED_TOKEN]"));
    }

    #[test]
    fn test_filter_leaves_attributes_alone() {
        let filter = test_filter();
        let mut record = LogRecord::new("info", "app", "hello").with_attribute("status", 200);

        filter.filter(&mut record);
        assert_eq!(record.attributes.get("status"), Some(&json!(200)));
    }

    #[test]
    fn test_closure_filter() {
        let drop_debug = |record: &mut LogRecord| record.level != "debug";
        let mut record = LogRecord::new("debug", "app", "x");
        assert!(!drop_debug.filter(&mut record));
    }
}
