//! Error types for the IVSS client crate.

use ivss_core::ValidationError;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Retry policy class for client failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRetryClass {
    Retryable,
    Permanent,
    ReauthRequired,
}

/// Errors surfaced to screens.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No token cached locally for a call that needs one.
    #[error("Not signed in. Please sign in first.")]
    Unauthenticated,

    /// The backend rejected the token. The cached token has been cleared.
    #[error("Your session has expired or is invalid. Please sign in again.")]
    SessionInvalid,

    /// Request-specific failure with a user-displayable message.
    #[error("{0}")]
    Failure(String),

    /// The request could not be completed (timeout, DNS, refused).
    #[error("Could not connect to the server: {0}")]
    Network(String),

    /// Client-side validation blocked the submission.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Local persistence failed.
    #[error("Local storage error: {0}")]
    Storage(#[from] ivss_core::Error),
}

impl ClientError {
    /// Create a failure error
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// The screen should redirect to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::SessionInvalid)
    }

    /// Classify error for retry policy.
    pub fn retry_class(&self) -> ApiRetryClass {
        match self {
            Self::Unauthenticated | Self::SessionInvalid => ApiRetryClass::ReauthRequired,
            Self::Network(_) => ApiRetryClass::Retryable,
            Self::Failure(_) | Self::Validation(_) | Self::Storage(_) => ApiRetryClass::Permanent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_require_login() {
        assert!(ClientError::Unauthenticated.requires_login());
        assert!(ClientError::SessionInvalid.requires_login());
        assert!(!ClientError::network("refused").requires_login());
        assert!(!ClientError::from(ValidationError::WeakPassword).requires_login());
    }

    #[test]
    fn retry_class_for_network_error_is_retryable() {
        assert_eq!(
            ClientError::network("timed out").retry_class(),
            ApiRetryClass::Retryable
        );
        assert_eq!(
            ClientError::failure("Placas duplicadas").retry_class(),
            ApiRetryClass::Permanent
        );
        assert_eq!(
            ClientError::SessionInvalid.retry_class(),
            ApiRetryClass::ReauthRequired
        );
    }
}
