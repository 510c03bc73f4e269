//! Error types for collate

use thiserror::Error;

/// The main error type for collate operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Bus communication errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Accessor called on a batch with no entries; indicates a coordinator
    /// bug, not a normal runtime condition
    #[error("Batch has no entries")]
    EmptyBatch,

    /// Downstream processor failures
    #[error("Processor error: {0}")]
    Processor(String),

    /// Attachment disposal failures
    #[error("Disposal error: {0}")]
    Disposal(String),

    /// Token budget bookkeeping errors
    #[error("Limits error: {0}")]
    Limits(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for collate operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
