//! Store error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Filesystem error while preparing folders or reading legacy files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Paths could not be resolved.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Stored or supplied game name is not a supported game.
    #[error("unsupported game: {0}")]
    InvalidGame(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
