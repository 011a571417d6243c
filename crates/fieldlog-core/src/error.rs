//! Error types for fieldlog-core

use thiserror::Error;

/// Result type alias using fieldlog-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fieldlog-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report id already exists in the local store
    #[error("Duplicate report id: {0}")]
    DuplicateId(String),

    /// Report not found
    #[error("Report not found: {0}")]
    NotFound(String),

    /// Rejected user input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Push or stream failure against the remote collaborator
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Rejected report input. Checked in a fixed order: location, then
/// technician, then findings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Location must be at least 3 characters")]
    LocationTooShort,
    #[error("Technician must be at least 2 characters")]
    TechnicianTooShort,
    #[error("Findings must be at least 10 characters")]
    FindingsTooShort,
}

/// Failures talking to the remote records service. Always recoverable: a
/// pending report stays pending and is retried on a later trigger.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Records API HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Records API rejected the record: {0}")]
    Rejected(String),
}
