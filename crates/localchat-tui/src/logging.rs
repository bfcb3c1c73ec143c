//! File logging.
//!
//! The terminal belongs to the UI, so log output goes to a file through a
//! non-blocking writer. The writer's guard lives until the process exits.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
};

use clap::ValueEnum;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Default log filter level.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Connection lifecycle and above
    #[default]
    Info,
    /// Dropped frames, ignored tags, state transitions
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Filter directive for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Logging setup failure.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// No file given and no home directory to default to.
    #[error("no log file given and no home directory found")]
    NoHome,

    /// Log file could not be opened.
    #[error("failed to open log file {path:?}: {source}")]
    Io {
        /// File being opened
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A global subscriber was already installed.
    #[error("failed to configure logger: {0}")]
    Configure(String),
}

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// `~/.localchat/logs/localchat.log`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".localchat").join("logs").join("localchat.log"))
}

/// Install the global subscriber writing to `file` (or the default path).
///
/// `RUST_LOG`, when set, replaces the `level` filter.
pub fn init(level: LogLevel, file: Option<&Path>) -> Result<(), LoggingError> {
    if GUARD.get().is_some() {
        return Ok(());
    }

    let path = match file {
        Some(path) => path.to_path_buf(),
        None => default_log_path().ok_or(LoggingError::NoHome)?,
    };
    let io_error = |source| LoggingError::Io { path: path.clone(), source };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).map_err(io_error)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(level >= LogLevel::Debug)
        .with_ansi(false)
        .with_writer(writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::Configure(e.to_string()))?;

    let _ = GUARD.set(guard);
    Ok(())
}
