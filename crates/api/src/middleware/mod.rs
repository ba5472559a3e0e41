//! Request middleware.

pub mod auth;

pub use auth::{AuthAdmin, TOKEN_HEADER, auth_middleware};
