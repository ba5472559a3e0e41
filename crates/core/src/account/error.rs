//! Account error types.

use packline_shared::{AppError, EmailError, JwtError};
use thiserror::Error;

use crate::auth::PasswordError;

/// Errors from admin account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Input failed validation.
    #[error("{0}")]
    Invalid(String),

    /// Registration with an email that is already taken.
    #[error("Admin user already exists")]
    AlreadyExists,

    /// Profile update to an email another admin uses.
    #[error("Email is already in use")]
    EmailTaken,

    /// Unknown email or wrong password at login.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Wrong current password on a password change.
    #[error("Old password is incorrect")]
    WrongPassword,

    /// No admin with this ID or email.
    #[error("Admin not found")]
    NotFound,

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token signing failed.
    #[error("token error: {0}")]
    Token(#[from] JwtError),

    /// Mail delivery failed.
    #[error("mail error: {0}")]
    Mail(#[from] EmailError),

    /// Store operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AccountError {
    /// Create a validation error.
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Invalid(msg) => Self::BadRequest(msg),
            e @ (AccountError::AlreadyExists | AccountError::EmailTaken) => {
                Self::Conflict(e.to_string())
            }
            e @ (AccountError::InvalidCredentials | AccountError::WrongPassword) => {
                Self::Unauthorized(e.to_string())
            }
            e @ AccountError::NotFound => Self::NotFound(e.to_string()),
            e @ AccountError::Mail(_) => Self::ExternalService(e.to_string()),
            e @ (AccountError::Password(_) | AccountError::Token(_)) => {
                Self::Internal(e.to_string())
            }
            AccountError::Repository(msg) => Self::Database(msg),
        }
    }
}
