//! Error types for FeedDeck.

use thiserror::Error;

/// Common error type for FeedDeck.
#[derive(Error, Debug)]
pub enum FeedDeckError {
    /// Database error.
    ///
    /// Wraps errors from any database backend, usually prefixed with the
    /// operation that failed ("unable to get entries: ...").
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

    /// Validation error for caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Feed fetching or parsing error.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for FeedDeckError {
    fn from(e: sqlx::Error) -> Self {
        FeedDeckError::Database(e.to_string())
    }
}

/// Result type alias for FeedDeck operations.
pub type Result<T> = std::result::Result<T, FeedDeckError>;
