//! Admin account routes: registration, login, profile, password reset and
//! the storefront contact mailer.

use axum::{
    Router,
    extract::{Path, State},
    middleware,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

use packline_core::account::{
    Admin, LoginInput, LoginOutcome, RegisterInput, ResetPasswordInput, UpdateProfileInput,
};
use packline_core::catalog::ContactMessage;

use super::ApiResult;
use crate::AppState;
use crate::error::ApiError;
use crate::extract::{ResourceId, ValidJson};
use crate::middleware::{AuthAdmin, auth_middleware};
use crate::response::{ApiResponse, Empty};

/// Cookie that mirrors the bearer token for browser clients.
pub const JWT_COOKIE: &str = "jwt";

/// Creates the admin router.
pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/admin/register", post(register))
        .route("/admin/login", post(login))
        .route("/admin/send", post(send_contact_mail))
        .route("/admin/send-otp/{email}", post(send_otp))
        .route("/admin/forgot-password", post(forgot_password));

    let protected = Router::new()
        .route("/admin/logout", post(logout))
        .route("/admin/profile/{id}", get(get_profile))
        .route("/admin/profile", put(update_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(protected)
}

/// POST /admin/register
async fn register(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterInput>,
) -> ApiResult<Admin> {
    let admin = state.accounts().register(input).await?;
    Ok(ApiResponse::created(admin, "Admin registered successfully"))
}

/// POST /admin/login
///
/// Returns the token in the body and also sets it as an http-only cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(input): ValidJson<LoginInput>,
) -> Result<(CookieJar, ApiResponse<LoginOutcome>), ApiError> {
    let outcome = state.accounts().login(input).await?;

    let cookie = Cookie::build((JWT_COOKIE, outcome.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), ApiResponse::ok(outcome, "Login successful")))
}

/// POST /admin/logout
///
/// Tokens are stateless; logging out only clears the cookie.
async fn logout(auth: AuthAdmin, jar: CookieJar) -> (CookieJar, ApiResponse<Empty>) {
    info!(admin_id = %auth.admin_id(), "Admin logged out");
    (
        jar.remove(Cookie::build(JWT_COOKIE).path("/")),
        ApiResponse::ok(Empty {}, "User Logged out"),
    )
}

/// GET /admin/profile/{id}
async fn get_profile(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Admin> {
    let admin = state.accounts().profile(id).await?;
    Ok(ApiResponse::ok(admin, "User profile fetched successfully"))
}

/// PUT /admin/profile
///
/// Updates the calling admin.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthAdmin,
    ValidJson(input): ValidJson<UpdateProfileInput>,
) -> ApiResult<Admin> {
    let admin = state
        .accounts()
        .update_profile(auth.admin_id(), input)
        .await?;
    Ok(ApiResponse::ok(admin, "Profile updated successfully"))
}

/// POST /admin/send-otp/{email}
async fn send_otp(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<String> {
    let otp = state.accounts().send_otp(&email).await?;
    Ok(ApiResponse::ok(otp, "OTP sent to email"))
}

/// POST /admin/forgot-password
async fn forgot_password(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ResetPasswordInput>,
) -> ApiResult<Option<()>> {
    state.accounts().reset_password(input).await?;
    Ok(ApiResponse::ok(None, "Password reset successfully"))
}

/// POST /admin/send
///
/// Forwards a storefront contact form to the configured inbox.
async fn send_contact_mail(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ContactMessage>,
) -> ApiResult<Empty> {
    let message = input.validate()?;
    state
        .email_service
        .forward_contact_form(&message.as_form())
        .await?;

    info!(from = %message.email, "Contact form forwarded");
    Ok(ApiResponse::ok(Empty {}, "Email sent successfully"))
}
