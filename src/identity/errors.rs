//! Identity errors
//!
//! Error types for the password-update collaborator.

use thiserror::Error;

/// Result type for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Password update failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// New password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    /// The identity service refused the update
    #[error("{message}")]
    Service { message: String },
}

impl IdentityError {
    /// Service failure carrying the collaborator's message
    pub fn service(message: impl Into<String>) -> Self {
        IdentityError::Service {
            message: message.into(),
        }
    }

    /// Returns true if the request itself was invalid and never reached the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IdentityError::PasswordMismatch | IdentityError::WeakPassword(_)
        )
    }
}
