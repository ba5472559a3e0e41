//! The auth gate for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use packline_core::account::Admin;

/// Header the admin dashboard sends the token in.
pub const TOKEN_HEADER: &str = "token";

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
}

/// The token from the `token` header, else from `Authorization: Bearer`.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let custom = headers
        .get(TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim);
    let bearer = || {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_bearer_token)
    };

    custom
        .filter(|t| !t.is_empty())
        .or_else(bearer)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Reads the token from the `token` header or `Authorization: Bearer`
/// 2. Verifies signature and expiry before touching the database
/// 3. Loads the admin named by `sub` and stores it in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_token(request.headers()) else {
        return Err(ApiError::unauthorized("No Token! Unauthorized!"));
    };

    let claims = state.jwt_service.validate_token(&token)?;

    let Some(admin) = state.accounts().principal(claims.admin_id()).await? else {
        debug!(admin_id = %claims.admin_id(), "Token names a deleted admin");
        return Err(ApiError::unauthorized("Unauthorized! - Invalid Token!"));
    };

    request.extensions_mut().insert(AuthAdmin(admin));
    Ok(next.run(request).await)
}

/// Extractor for the authenticated admin.
///
/// Only available behind [`auth_middleware`]:
///
/// ```ignore
/// async fn handler(admin: AuthAdmin) -> impl IntoResponse {
///     let admin_id = admin.admin_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub Admin);

impl AuthAdmin {
    /// Returns the admin ID.
    #[must_use]
    pub const fn admin_id(&self) -> Uuid {
        self.0.id
    }

    /// Returns the admin profile.
    #[must_use]
    pub const fn admin(&self) -> &Admin {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
