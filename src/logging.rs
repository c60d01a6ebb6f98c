//! Logging System
//!
//! Structured logging via the `tracing` crate: configurable level, text or
//! JSON format, and stdout/stderr/file destinations.

use crate::error::SandcastError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file (default: stderr)
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is file; None means the platform default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: true,
        }
    }
}

/// Platform default log file path (state directory).
pub fn default_log_file_path() -> Result<PathBuf, SandcastError> {
    let project_dirs = directories::ProjectDirs::from("", "sandcast", "sandcast").ok_or_else(|| {
        SandcastError::Config("could not determine platform state directory for log file".to_string())
    })?;
    let state_dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_dir())
        .to_path_buf();
    Ok(state_dir.join("sandcast.log"))
}

/// Initialize the global tracing subscriber from config.
///
/// A second initialization in the same process is a no-op.
pub fn init_logging(config: &LoggingConfig) -> Result<(), SandcastError> {
    if !config.enabled {
        return Ok(());
    }
    let filter = EnvFilter::try_new(config.level.as_str()).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match (config.format.as_str(), config.output.as_str()) {
        ("json", "stdout") => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        ("json", "file") => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(open_log_file(config)?),
            )
            .try_init(),
        ("json", _) => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (_, "stdout") => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_ansi(config.color)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        (_, "file") => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(open_log_file(config)?),
            )
            .try_init(),
        _ => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_ansi(config.color)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    // An already-installed subscriber (tests, embedding hosts) is fine.
    let _ = result;
    Ok(())
}

fn open_log_file(config: &LoggingConfig) -> Result<Arc<std::fs::File>, SandcastError> {
    let path = match &config.file {
        Some(p) => p.clone(),
        None => default_log_file_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| SandcastError::Config(format!("failed to create log directory: {e}")))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| SandcastError::Config(format!("failed to open log file: {e}")))?;
    Ok(Arc::new(file))
}
