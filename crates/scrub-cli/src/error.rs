//! CLI error type and its exit-code mapping.

use std::io;
use std::path::PathBuf;

use scrub_log::LogInitError;
use scrub_redact::{CatalogBuildError, ConfigError};
use thiserror::Error;

use crate::exit_codes::ExitCode;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid rule file: {0}")]
    Rules(#[from] ConfigError),

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogBuildError),

    #[error("logging setup failed: {0}")]
    Logging(#[from] LogInitError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Rules(ConfigError::Io { .. }) => ExitCode::IoError,
            CliError::Rules(_) | CliError::Catalog(_) => ExitCode::ArgsError,
            CliError::Logging(LogInitError::FileSink { .. }) => ExitCode::IoError,
            CliError::Logging(_) => ExitCode::ArgsError,
            CliError::Read { .. } | CliError::Write(_) => ExitCode::IoError,
        }
    }
}
