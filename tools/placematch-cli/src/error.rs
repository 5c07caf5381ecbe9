//! Error types for the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// placematch error.
    #[error("{0}")]
    Placematch(#[from] placematch::Error),

    /// No extractor given on the command line or in the config.
    #[error("no feature extractor. Use --extractor or add [extractor] to the config file")]
    NoExtractor,

    /// Neither a vector nor an image to query with.
    #[error("nothing to query with. Use --vector or --image")]
    NoQuery,

    /// File not found.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid log filter directive.
    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),
}
