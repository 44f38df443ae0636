//! Application-level errors

use std::path::PathBuf;
use thiserror::Error;

/// Application errors cover loading hierarchy data and settings.
///
/// Building and navigating a hierarchy never fails; only the edges
/// that touch files do.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("cannot parse hierarchy data in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported hierarchy format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("hierarchy file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("no hierarchy source given (pass a file, --sample, or set `source` in config)")]
    NoSource,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
