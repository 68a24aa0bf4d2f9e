//! Fuzz target for the filter adapter.
//!
//! Whatever shape the message takes, the filter keeps the record and leaves
//! behind exactly the engine's redaction of that message.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use scrub_redact::{LogRecord, RecordFilter, RedactionEngine, RedactionFilter};
use serde_json::Value;

static FILTER: Lazy<RedactionFilter> = Lazy::new(|| {
    RedactionFilter::new(RedactionEngine::standard().expect("standard catalog compiles"))
});

#[derive(Debug, Arbitrary)]
enum Message {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<String>),
    Object(Vec<(String, String)>),
}

impl From<Message> for Value {
    fn from(message: Message) -> Value {
        match message {
            Message::Text(s) => Value::String(s),
            Message::Int(n) => Value::from(n),
            Message::Float(f) => Value::from(f),
            Message::Bool(b) => Value::Bool(b),
            Message::Null => Value::Null,
            Message::List(items) => Value::from(items),
            Message::Object(pairs) => Value::Object(
                pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect(),
            ),
        }
    }
}

fuzz_target!(|message: Message| {
    let message = Value::from(message);
    let expected = FILTER.engine().redact_json(&message);

    let mut record = LogRecord::new("info", "fuzz", message);
    assert!(FILTER.filter(&mut record));
    assert_eq!(record.message_str(), Some(expected.as_str()));
});
