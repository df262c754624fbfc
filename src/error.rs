// Error handling module for the School API
// Provides the error taxonomy shared by every handler and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error, warn};

/// Main error type for the API
/// All handlers return Result<T, ApiError>
///
/// Every variant renders as `{"error": "<message>"}`. Internal failures
/// are logged with their detail and answered with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request fields
    /// Maps to HTTP 400 Bad Request
    #[error("{0}")]
    ValidationError(String),

    /// Missing or malformed Authorization header, or unknown caller
    /// Maps to HTTP 401 Unauthorized
    #[error("{0}")]
    Unauthenticated(String),

    /// Login with an unknown email or a wrong password
    /// Maps to HTTP 401 Unauthorized
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Role or tenancy denial, or an invalid/expired token
    /// Maps to HTTP 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Unexpected failure; the detail never reaches the client
    /// Maps to HTTP 500 Internal Server Error
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationError(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        ApiError::NotFound { resource }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Internal(detail.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Internal(detail) => error!("Internal error: {}", detail),
            ApiError::Unauthenticated(msg) | ApiError::Forbidden(msg) => {
                warn!("Access rejected ({}): {}", status.as_u16(), msg)
            }
            ApiError::InvalidCredentials => warn!("Login rejected: invalid credentials"),
            ApiError::ValidationError(msg) => debug!("Validation error: {}", msg),
            ApiError::NotFound { resource } => debug!("{} not found", resource),
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
