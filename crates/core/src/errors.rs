//! Error types for the IVSS core crate.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Client-side checks that block a submission before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required form fields are empty.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Password does not meet the complexity rules.
    #[error(
        "Password must have at least 8 characters, one uppercase letter, one digit, \
         and only letters (A-Z) and digits"
    )]
    WeakPassword,

    /// Email is present but has no local part to derive a username from.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Entered engine credential is empty or matches no known candidate.
    #[error("Credential does not match")]
    CredentialMismatch,
}

impl ValidationError {
    /// Create a missing-fields error from field names.
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingFields(fields.into_iter().map(Into::into).collect())
    }
}

/// Errors raised by the core crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Persistence collaborator failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Form or credential validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}
