//! Error types for Sift
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for Sift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the search layer and its collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied invalid or missing search options
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Document store has no document with this id
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Document is malformed (e.g. missing a string `_id`)
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Failure inside the view engine (build, update, query, destroy)
    #[error("View engine error: {0}")]
    ViewEngine(String),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a `BadRequest` error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Error::BadRequest(msg.into())
    }

    /// Create a `ViewEngine` error
    pub fn view_engine(msg: impl Into<String>) -> Self {
        Error::ViewEngine(msg.into())
    }

    /// Create a `Config` error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// True if the error was caused by the caller's options
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::BadRequest(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
