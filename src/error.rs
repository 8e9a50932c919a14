//! Error types shared by the scheduler, the card store and the UI shell.

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad input to an operation, e.g. an interval below 1 or an unknown quality.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Card {0} not found")]
    NotFound(i64),

    /// The card was updated by someone else since it was read.
    #[error("Card {id} was modified concurrently")]
    Conflict { id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
