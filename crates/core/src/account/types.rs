//! Admin account types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An admin account as shown to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    /// Admin ID; the `sub` claim of issued tokens.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email, stored lowercased.
    pub email: String,
    /// Avatar image URL.
    pub avatar: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An admin together with the stored password hash.
#[derive(Clone)]
pub struct AdminRecord {
    /// Public profile.
    pub profile: Admin,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl fmt::Debug for AdminRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminRecord")
            .field("profile", &self.profile)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// A new admin ready to store.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub password_hash: String,
}

/// Fields to change on an admin. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct AdminChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub password_hash: Option<String>,
}

/// Body of `POST /admin/register`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

/// Body of `POST /admin/login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `PUT /admin/profile`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Body of `POST /admin/forgot-password`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPasswordInput {
    pub email: Option<String>,
    pub new_password: Option<String>,
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    /// Signed bearer token.
    pub token: String,
    /// The admin who logged in.
    pub admin: Admin,
}

/// Lowercased, trimmed email; `None` when blank.
pub(crate) fn normalize_email(raw: Option<&str>) -> Option<String> {
    raw.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty())
}

/// Trimmed text; `None` when blank.
pub(crate) fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
