//! Upload error types.

use packline_shared::AppError;
use thiserror::Error;

use crate::storage::StorageError;

/// Upload pipeline errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// File size exceeds maximum allowed.
    #[error("File {field} is {size} bytes, larger than the {max} byte limit")]
    FileTooLarge {
        /// Multipart field the file arrived in.
        field: String,
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// MIME type not allowed.
    #[error("File type '{mime_type}' is not allowed")]
    InvalidMimeType {
        /// The rejected MIME type.
        mime_type: String,
    },

    /// The image host failed.
    #[error("image upload failed: {0}")]
    Host(#[from] StorageError),

    /// Staging the upload on local disk failed.
    #[error("failed to stage upload: {0}")]
    Io(String),
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            e @ (UploadError::FileTooLarge { .. } | UploadError::InvalidMimeType { .. }) => {
                Self::BadRequest(e.to_string())
            }
            e @ UploadError::Host(_) => Self::ExternalService(e.to_string()),
            UploadError::Io(msg) => Self::Internal(msg),
        }
    }
}
