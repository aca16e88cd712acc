//! CLI error types

use thiserror::Error;

use crate::store::StoreError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid or unreadable configuration
    #[error("config error: {0}")]
    Config(String),

    /// Store open or replay failure (a corrupt journal halts boot)
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Runtime or server I/O failure
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        CliError::Config(message.into())
    }
}
