// Authentication error types

use crate::error::ApiError;

/// Failures raised by the password and token services
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Password hashing error")]
    PasswordHashError,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Invalid role. Must be one of: superadmin, schooladmin (got '{0}')")]
    InvalidRole(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::ExpiredToken => {
                ApiError::forbidden("Forbidden: Invalid or expired token")
            }
            AuthError::InvalidRole(_) => {
                ApiError::validation("Invalid role. Must be one of: superadmin, schooladmin")
            }
            AuthError::PasswordHashError | AuthError::TokenGenerationError(_) => {
                ApiError::internal(err.to_string())
            }
        }
    }
}
