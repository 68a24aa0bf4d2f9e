//! Tracing layer that runs record filters before any sink sees an event.
//!
//! Every event becomes a [`LogRecord`], passes through the registered
//! [`RecordFilter`]s in order, is formatted once, and the same line goes to
//! every sink. Filtering happens before any sink lock is taken.

use std::fmt::Write as _;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use scrub_redact::{LogRecord, RecordFilter};
use serde_json::{Map, Value};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::config::LogFormat;

/// Timestamp format shared by both output formats (UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

type Sink = Mutex<Box<dyn Write + Send>>;

/// Collects event fields into a message and attributes.
#[derive(Default)]
struct RecordVisitor {
    message: Option<Value>,
    fields: Map<String, Value>,
}

impl RecordVisitor {
    fn put(&mut self, field: &tracing::field::Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl tracing::field::Visit for RecordVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.put(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.put(field, Value::String(format!("{:?}", value)));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.put(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.put(field, Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        let value = match serde_json::Number::from_f64(value) {
            Some(n) => Value::Number(n),
            None => Value::String(value.to_string()),
        };
        self.put(field, value);
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.put(field, Value::Bool(value));
    }

    fn record_error(
        &mut self,
        field: &tracing::field::Field,
        value: &(dyn std::error::Error + 'static),
    ) {
        let mut text = value.to_string();
        let mut source = value.source();
        while let Some(cause) = source {
            let _ = write!(text, ": {}", cause);
            source = cause.source();
        }
        self.put(field, Value::String(text));
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Message text for output. Filters normally leave a string behind; without
/// one, non-text messages fall back to their JSON form.
fn message_text(message: &Value) -> String {
    match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `<ts> <LEVEL> <target>: <message> k=v...`
pub fn format_human(record: &LogRecord, ts: Option<DateTime<Utc>>) -> String {
    let mut line = String::new();
    if let Some(ts) = ts {
        let _ = write!(line, "{} ", ts.format(TIMESTAMP_FORMAT));
    }
    let _ = write!(
        line,
        "{:<5} {}: {}",
        record.level.to_uppercase(),
        record.target,
        message_text(&record.message)
    );
    for (key, value) in &record.attributes {
        let _ = write!(line, " {}={}", key, value);
    }
    line
}

/// `{"ts","level","target","message","fields"}` on one line.
pub fn format_jsonl(record: &LogRecord, ts: DateTime<Utc>) -> String {
    let mut obj = Map::new();
    obj.insert(
        "ts".to_string(),
        Value::String(ts.format(TIMESTAMP_FORMAT).to_string()),
    );
    obj.insert("level".to_string(), Value::String(record.level.clone()));
    obj.insert("target".to_string(), Value::String(record.target.clone()));
    obj.insert(
        "message".to_string(),
        Value::String(message_text(&record.message)),
    );
    if !record.attributes.is_empty() {
        let fields: Map<String, Value> = record
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        obj.insert("fields".to_string(), Value::Object(fields));
    }
    serde_json::to_string(&Value::Object(obj)).unwrap_or_default()
}

/// The pipeline's tracing layer.
pub struct PipelineLayer {
    format: LogFormat,
    timestamps: bool,
    filters: Vec<Arc<dyn RecordFilter>>,
    sinks: Vec<Sink>,
}

impl PipelineLayer {
    /// A layer with no filters and no sinks.
    pub fn new(format: LogFormat) -> Self {
        PipelineLayer {
            format,
            timestamps: true,
            filters: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// Include timestamps in human output. JSON lines always carry `ts`.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Append a filter stage. Stages run in the order they are added.
    pub fn with_filter(mut self, filter: Arc<dyn RecordFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append a sink.
    pub fn with_sink<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.sinks.push(Mutex::new(Box::new(writer)));
        self
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Run filters over `record`. Returns `false` as soon as one drops it.
    pub fn apply_filters(&self, record: &mut LogRecord) -> bool {
        self.filters.iter().all(|filter| filter.filter(record))
    }

    fn format(&self, record: &LogRecord, ts: DateTime<Utc>) -> String {
        match self.format {
            LogFormat::Human => format_human(record, self.timestamps.then_some(ts)),
            LogFormat::Jsonl => format_jsonl(record, ts),
        }
    }

    fn dispatch(&self, line: &str) {
        for sink in &self.sinks {
            let mut writer = sink.lock().unwrap_or_else(PoisonError::into_inner);
            let _ = writer.write_all(line.as_bytes());
            let _ = writer.flush();
        }
    }
}

impl std::fmt::Debug for PipelineLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineLayer")
            .field("format", &self.format)
            .field("timestamps", &self.timestamps)
            .field("filters", &self.filters.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl<S> Layer<S> for PipelineLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let ts = Utc::now();
        let metadata = event.metadata();

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let mut record = LogRecord {
            level: level_name(metadata.level()).to_string(),
            target: metadata.target().to_string(),
            message: visitor
                .message
                .unwrap_or_else(|| Value::String(String::new())),
            attributes: visitor.fields.into_iter().collect(),
        };

        if !self.apply_filters(&mut record) {
            return;
        }

        let mut line = self.format(&record, ts);
        line.push('\n');
        self.dispatch(&line);
    }
}
