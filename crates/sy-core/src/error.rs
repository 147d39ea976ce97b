//! Error types for StrangeYield

use thiserror::Error;

/// StrangeYield error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error (bad configuration, inconsistent inputs)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Binning error (unsorted edges, mismatched axes)
    #[error("Binning error: {0}")]
    Binning(String),

    /// A required named object is absent from an object list
    #[error("Missing object: '{0}'")]
    MissingObject(String),

    /// Finalization cannot proceed (e.g. no triggered events)
    #[error("Finalization error: {0}")]
    Finalization(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
