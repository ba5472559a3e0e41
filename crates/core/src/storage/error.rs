//! Storage error types.

use thiserror::Error;

/// Image host errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// Reading the local file failed.
    #[error("failed to read upload: {0}")]
    Io(String),

    /// The hosting API could not be reached.
    #[error("image host request failed: {0}")]
    Http(String),

    /// The hosting API answered with an error.
    #[error("image host rejected upload ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the host.
        status: u16,
        /// Error text returned by the host.
        message: String,
    },
}

impl StorageError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        Self::Operation(err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
