//! Error types for Memwall.

use thiserror::Error;

/// Common error type for Memwall.
#[derive(Error, Debug)]
pub enum WallError {
    /// Database error.
    ///
    /// This is a generic database error that wraps errors from any database
    /// backend. Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invite code error.
    #[error("invite code error: {0}")]
    Invite(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// File storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for WallError {
    fn from(e: sqlx::Error) -> Self {
        WallError::Database(e.to_string())
    }
}

/// Result type alias using WallError.
pub type Result<T> = std::result::Result<T, WallError>;
