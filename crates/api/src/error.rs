//! Error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use packline_shared::AppError;
use tracing::{error, warn};

use crate::response::Envelope;

/// Any handler failure, rendered as an error envelope.
///
/// Everything that converts into [`AppError`] converts into this, so
/// handlers can use `?` on core, account, upload and JWT errors alike.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with a message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(AppError::BadRequest(msg.into()))
    }

    /// 401 with a message.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(msg.into()))
    }

    /// The wrapped error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }
}

impl<E: Into<AppError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_internal() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else if status == StatusCode::UNAUTHORIZED {
            warn!(error = %self.0, "Request rejected");
        }

        let body = Envelope {
            status_code: status.as_u16(),
            data: serde_json::Value::Null,
            message: self.0.public_message(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}
