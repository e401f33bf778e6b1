//! Error types for jsondb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using JsonDbError
pub type Result<T> = std::result::Result<T, JsonDbError>;

/// Unified error type for jsondb operations
#[derive(Debug, Error)]
pub enum JsonDbError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Lookup / Validation Errors
    // -------------------------------------------------------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Index {index} out of bounds for collection of {len} entries")]
    IndexOutOfBounds { index: usize, len: usize },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Crypto Errors
    // -------------------------------------------------------------------------
    #[error("Crypto error: {0}")]
    Crypto(String),

    // -------------------------------------------------------------------------
    // Transaction Errors
    // -------------------------------------------------------------------------
    #[error("Transaction panicked: {0}")]
    TransactionPanicked(String),

    #[error("Transaction queue closed")]
    QueueClosed,
}

impl From<serde_json::Error> for JsonDbError {
    fn from(err: serde_json::Error) -> Self {
        JsonDbError::Serialization(err.to_string())
    }
}
