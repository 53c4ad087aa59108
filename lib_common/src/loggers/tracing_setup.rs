//! # Tracing Setup
//!
//! Installs the global `tracing` subscriber: an `EnvFilter`, a console layer
//! on stderr (stdout is reserved for cell output) and an optional JSON file
//! layer that rolls daily.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    /// The level string is not a valid filter directive.
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber is already installed.
    #[error("Logging is already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Options controlling where log output goes.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`, `lib_common=debug`).
    pub level: String,
    /// Directory for daily JSON log files; `None` disables file output.
    pub log_dir: Option<PathBuf>,
    /// File name prefix for the rolling log files.
    pub file_prefix: String,
    /// Colorize console output.
    pub ansi: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            log_dir: None,
            file_prefix: "exante".to_string(),
            ansi: true,
        }
    }
}

impl LoggingOptions {
    /// Builds the filter: `RUST_LOG` wins, otherwise the configured level.
    pub fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(&self.level)?),
        }
    }
}

/// Installs the global subscriber.
///
/// Returns the file writer guard when file output is enabled; dropping it
/// flushes and stops the background writer, so keep it alive for the
/// lifetime of the program.
pub fn init_logging(options: &LoggingOptions) -> Result<Option<WorkerGuard>, LoggingError> {
    let env_filter = options.env_filter()?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_ansi(options.ansi)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &options.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = rolling::daily(dir, &options.file_prefix);
            let (writer, guard) = non_blocking(file_appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer).json();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!(level = %options.level, log_dir = ?options.log_dir, "logging initialized");
    Ok(guard)
}
