//! Common error types for dbprobe

use std::time::Duration;
use thiserror::Error;

/// Common result type for dbprobe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the checker and its catalog backends
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External database client exited unsuccessfully
    #[error("Client exited with {}: {}", format_status(*.status), .stderr.trim())]
    Client {
        /// Exit code, `None` when killed by a signal
        status: Option<i32>,
        stderr: String,
    },

    /// Query did not complete in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

fn format_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}
