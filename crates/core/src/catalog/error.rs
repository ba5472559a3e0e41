//! Catalog error types.

use packline_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::upload::UploadError;

/// Catalog operation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input failed validation.
    #[error("{0}")]
    Invalid(String),

    /// A record with the same identity already exists.
    #[error("{label} {key} already exists")]
    Duplicate {
        /// Resource label, e.g. "Category".
        label: &'static str,
        /// Human description of the colliding identity.
        key: String,
    },

    /// No record with this ID.
    #[error("{label} not found")]
    NotFound {
        /// Resource label.
        label: &'static str,
        /// The ID that was looked up.
        id: Uuid,
    },

    /// Uploading attached images failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Store operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl CatalogError {
    /// Create a validation error.
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub const fn not_found(label: &'static str, id: Uuid) -> Self {
        Self::NotFound { label, id }
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Invalid(msg) => Self::BadRequest(msg),
            e @ CatalogError::Duplicate { .. } => Self::Conflict(e.to_string()),
            e @ CatalogError::NotFound { .. } => Self::NotFound(e.to_string()),
            CatalogError::Upload(e) => e.into(),
            CatalogError::Repository(msg) => Self::Database(msg),
        }
    }
}
