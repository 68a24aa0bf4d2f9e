//! Logging pipeline with pluggable record filters.
//!
//! Events emitted through `tracing` are turned into [`LogRecord`]s, run
//! through the registered filter stages, and written to the configured
//! sinks:
//! - console (stderr by default, keeping stdout clean for command payloads)
//! - a size-capped rotating file
//!
//! Nothing is global until [`LoggingPipeline::init`] is called; the pipeline
//! is built explicitly and its filters are injected by the caller.
//!
//! ```no_run
//! use scrub_log::{LogConfig, LoggingPipeline};
//! use scrub_redact::{RedactionEngine, RedactionFilter};
//!
//! let engine = RedactionEngine::standard().unwrap();
//! LoggingPipeline::new(LogConfig::default())
//!     .with_filter(RedactionFilter::new(engine))
//!     .init()
//!     .unwrap();
//!
//! tracing::info!("contact user@example.com"); // logged as "contact [REDACTED_EMAIL]"
//! ```

pub mod config;
pub mod layer;
pub mod rotate;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use config::{
    ConsoleStream, FileSinkConfig, LogConfig, LogFormat, LogLevel, DEFAULT_BACKUPS,
    DEFAULT_MAX_BYTES,
};
pub use layer::{format_human, format_jsonl, PipelineLayer, TIMESTAMP_FORMAT};
pub use rotate::RotatingFileWriter;
pub use scrub_redact::{LogRecord, RecordFilter};

/// Errors raised while installing the pipeline.
#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("failed to open log file {path}: {source}")]
    FileSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized(#[source] tracing_subscriber::util::TryInitError),
}

/// Builder for the logging pipeline.
#[derive(Clone)]
pub struct LoggingPipeline {
    config: LogConfig,
    filters: Vec<Arc<dyn RecordFilter>>,
}

impl LoggingPipeline {
    pub fn new(config: LogConfig) -> Self {
        LoggingPipeline {
            config,
            filters: Vec::new(),
        }
    }

    /// Register a filter stage. Stages run in registration order.
    pub fn with_filter<F: RecordFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Register a filter stage that is shared with other owners.
    pub fn with_shared_filter(mut self, filter: Arc<dyn RecordFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Open the sinks and build the layer without installing it.
    pub fn into_layer(self) -> Result<PipelineLayer, LogInitError> {
        let mut layer =
            PipelineLayer::new(self.config.format).with_timestamps(self.config.timestamps);

        for filter in self.filters {
            layer = layer.with_filter(filter);
        }

        match self.config.console {
            Some(ConsoleStream::Stderr) => layer = layer.with_sink(io::stderr()),
            Some(ConsoleStream::Stdout) => layer = layer.with_sink(io::stdout()),
            None => {}
        }

        if let Some(file) = &self.config.file {
            let writer = RotatingFileWriter::open(file).map_err(|source| LogInitError::FileSink {
                path: file.path.clone(),
                source,
            })?;
            layer = layer.with_sink(writer);
        }

        Ok(layer)
    }

    /// Install the pipeline as the global subscriber.
    ///
    /// Fails if the file sink cannot be opened or a subscriber is already set.
    pub fn init(self) -> Result<(), LogInitError> {
        let filter = self.config.env_filter();
        let layer = self.into_layer()?;

        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
            .map_err(LogInitError::AlreadyInitialized)
    }
}

impl std::fmt::Debug for LoggingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingPipeline")
            .field("config", &self.config)
            .field("filters", &self.filters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_redact::{RedactionEngine, RedactionFilter};
    use tempfile::TempDir;

    #[test]
    fn test_into_layer_wires_filters_and_sinks() {
        let tmp = TempDir::new().unwrap();
        let config = LogConfig::default()
            .with_file(FileSinkConfig::new(tmp.path().join("app.log")));

        let layer = LoggingPipeline::new(config)
            .with_filter(RedactionFilter::new(RedactionEngine::standard().unwrap()))
            .into_layer()
            .unwrap();

        assert_eq!(layer.filter_count(), 1);
        assert_eq!(layer.sink_count(), 2);
    }

    #[test]
    fn test_console_can_be_disabled() {
        let layer = LoggingPipeline::new(LogConfig::default().with_console(None))
            .into_layer()
            .unwrap();
        assert_eq!(layer.sink_count(), 0);
    }

    #[test]
    fn test_unopenable_file_sink_errors() {
        let tmp = TempDir::new().unwrap();
        // A directory cannot be opened as the active log file.
        let config = LogConfig::default().with_file(FileSinkConfig::new(tmp.path()));

        let err = LoggingPipeline::new(config).into_layer().unwrap_err();
        assert!(matches!(err, LogInitError::FileSink { .. }));
        assert!(err.to_string().contains("failed to open log file"));
    }

    #[test]
    fn test_config_is_kept_until_layer_is_built() {
        let pipeline = LoggingPipeline::new(LogConfig::default().with_format(LogFormat::Jsonl));
        assert_eq!(pipeline.config().format, LogFormat::Jsonl);
        assert!(pipeline.config().file.is_none());
    }

    #[test]
    fn test_debug_reports_filter_count() {
        let pipeline = LoggingPipeline::new(LogConfig::default())
            .with_filter(|_: &mut LogRecord| true);
        assert!(format!("{:?}", pipeline).contains("filters: 1"));
    }
}
