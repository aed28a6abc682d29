//! CLI error type.

use recordkit_core::RecordError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced by the `recordkit` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// A collection operation failed.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Reading or writing the data file failed.
    #[error("cannot access {path}: {source}")]
    Io {
        /// The data file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The data file is not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// The data file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}
