//! The response envelope every route returns.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Wire shape: `{statusCode, data, message, success}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Mirrors the HTTP status.
    pub status_code: u16,
    /// Payload; `null` on errors.
    pub data: T,
    /// Human-readable outcome.
    pub message: String,
    /// `true` for 2xx responses.
    pub success: bool,
}

/// A successful response.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
    message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, data, message)
    }

    /// 201 Created.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CREATED, data, message)
    }

    /// Any status.
    pub fn with_status(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status,
            data,
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            status_code: self.status.as_u16(),
            data: self.data,
            message: self.message,
            success: self.status.is_success(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// The empty object `{}` some routes return as data.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Empty {}
