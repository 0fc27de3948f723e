//! Error types for momentum-core

use thiserror::Error;

/// Main error type for the momentum-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied a malformed argument (inverted window, non-positive
    /// day count, out-of-range rating). Never used for empty data sets,
    /// which have defined zero/empty results.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Record lookup miss for CRUD operations
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
}

impl Error {
    /// Shorthand for `NotFound` with a static resource name.
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            resource,
            id: id.into(),
        }
    }
}

/// Result type alias for momentum-core
pub type Result<T> = std::result::Result<T, Error>;
