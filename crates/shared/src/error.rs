//! Application-wide error types.

use thiserror::Error;

use crate::email::EmailError;
use crate::jwt::JwtError;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// External service error (image host, mail relay).
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::ExternalService(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the detail of this error must stay server-side.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message safe to hand to a client.
    ///
    /// Client errors carry their own message; server errors collapse to a
    /// generic one.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Database(_) | Self::ExternalService(_) | Self::Internal(_) => {
                "Internal Server Error".to_string()
            }
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::Unauthorized("Token has expired".to_string()),
            JwtError::DecodingError(_) => Self::Unauthorized("Invalid token".to_string()),
            JwtError::EncodingError(msg) => Self::Internal(msg),
        }
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        Self::ExternalService(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
