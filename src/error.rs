//! Common error types for obsync

use thiserror::Error;

/// Common result type for obsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared across the engine
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (wraps serde_json::Error)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wizard step validation failure; one human-readable message per step
    #[error("{0}")]
    Validation(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network or transport failure (push channel, API call)
    #[error("Network error: {0}")]
    Network(String),

    /// Backend API returned a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Internal engine error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for failures the UI recovers from in place (re-prompt, retry),
    /// as opposed to infrastructure errors.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::InvalidInput(_) | Error::Network(_) | Error::Api(_, _)
        )
    }
}
