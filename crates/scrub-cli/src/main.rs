//! scrub - redact sensitive data from log text.
//!
//! The entry point wires the pieces together explicitly:
//! rule file -> catalog -> engine -> redaction filter -> logging pipeline.
//! Every log line the tool itself emits goes through the same filter.

mod commands;
mod error;
mod exit_codes;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use scrub_log::{
    FileSinkConfig, LogConfig, LogFormat, LogLevel, LoggingPipeline, DEFAULT_BACKUPS,
    DEFAULT_MAX_BYTES,
};
use scrub_redact::{PatternCatalog, RedactionConfig, RedactionEngine, RedactionFilter};

use crate::commands::OutputFormat;
use crate::error::CliError;
use crate::exit_codes::ExitCode;

/// Redact credentials and personal data from log text
#[derive(Parser)]
#[command(name = "scrub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Rule file (TOML, or JSON by extension) extending or replacing the standard catalog
    #[arg(long, global = true, env = "SCRUB_RULES")]
    rules: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Also write logs to this file, rotating by size
    #[arg(long, global = true, env = "SCRUB_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Rotate the log file once it would exceed this many bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_BYTES)]
    log_max_bytes: u64,

    /// Number of rotated log files to keep
    #[arg(long, global = true, default_value_t = DEFAULT_BACKUPS)]
    log_backups: usize,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Redact files (or stdin) and write the result to stdout
    Redact(RedactArgs),

    /// List detection categories in evaluation order
    Categories(CategoriesArgs),

    /// Emit a sample log run through the redaction pipeline
    Demo,
}

#[derive(Args, Debug)]
struct RedactArgs {
    /// Input files; stdin when omitted or given as "-"
    files: Vec<PathBuf>,

    /// Redact each line separately (multi-line private keys are not caught)
    #[arg(long)]
    lines: bool,
}

#[derive(Args, Debug)]
struct CategoriesArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let exit_code = match run(cli) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("scrub: error [{}]: {}", code.code_name(), err);
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: Cli) -> Result<(), CliError> {
    let engine = build_engine(cli.global.rules.as_deref())?;

    let pipeline = LoggingPipeline::new(log_config(&cli.global))
        .with_filter(RedactionFilter::new(engine.clone()));
    let log_format = pipeline.config().format;
    pipeline.init()?;

    tracing::debug!(
        categories = engine.catalog().len(),
        custom_rules = cli.global.rules.is_some(),
        log_format = %log_format,
        "redaction catalog ready"
    );

    match cli.command {
        Commands::Redact(args) => commands::run_redact(&engine, &args.files, args.lines),
        Commands::Categories(args) => commands::run_categories(engine.catalog(), args.format),
        Commands::Demo => {
            commands::run_demo();
            Ok(())
        }
    }
}

fn build_engine(rules: Option<&Path>) -> Result<RedactionEngine, CliError> {
    let catalog = match rules {
        Some(path) => RedactionConfig::load(path)?.build_catalog()?,
        None => PatternCatalog::standard()?,
    };
    Ok(RedactionEngine::new(Arc::new(catalog)))
}

fn log_config(global: &GlobalOpts) -> LogConfig {
    let verbosity = if global.quiet {
        Some(LogLevel::Error)
    } else {
        match global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };

    let mut config = LogConfig::from_env(global.log_level.or(verbosity), global.log_format);
    if let Some(path) = &global.log_file {
        config = config.with_file(
            FileSinkConfig::new(path)
                .with_max_bytes(global.log_max_bytes)
                .with_backups(global.log_backups),
        );
    }
    config
}
