use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while loading and preparing analytics tables.
///
/// Metric functions never fail; every variant here belongs to the loader,
/// the filter selection or the command-line surface.
#[derive(Error, Debug)]
pub enum PulseError {
    /// A dataset file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON record could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A date or timestamp string did not match any recognised format.
    #[error("Invalid date format: {0}")]
    DateParse(String),

    /// A date range whose end precedes its start.
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// The expected data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the pulse crates.
pub type Result<T> = std::result::Result<T, PulseError>;
