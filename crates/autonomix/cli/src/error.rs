//! CLI error types

use thiserror::Error;

/// Errors surfaced to the operator
#[derive(Debug, Error)]
pub enum CliError {
    /// Transport failure talking to the daemon
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Daemon reported a missing resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Daemon rejected the request
    #[error("{code} ({status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Arguments failed local validation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A mutating command was issued without a caller identity
    #[error("No caller principal configured; pass --caller or set AUTONOMIX_CALLER")]
    MissingCaller,
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;
