//! Admin registration, login, profile and password reset.

use std::future::Future;
use std::sync::Arc;

use packline_shared::{EmailError, EmailService, JwtService};
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use super::error::AccountError;
use super::types::{
    Admin, AdminChanges, AdminRecord, LoginInput, LoginOutcome, NewAdmin, RegisterInput,
    ResetPasswordInput, UpdateProfileInput, non_blank, normalize_email,
};
use crate::auth::{hash_password, verify_password};

/// Persistence for admin accounts.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AdminStore: Send + Sync {
    /// Find an admin by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<AdminRecord>, AccountError>> + Send;

    /// Find an admin by (lowercased) email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<AdminRecord>, AccountError>> + Send;

    /// Insert a new admin.
    fn insert(&self, admin: NewAdmin) -> impl Future<Output = Result<Admin, AccountError>> + Send;

    /// Apply changes to an admin.
    fn update(
        &self,
        id: Uuid,
        changes: AdminChanges,
    ) -> impl Future<Output = Result<Admin, AccountError>> + Send;
}

/// Outbound mail used by the account flows.
pub trait Mailer: Send + Sync {
    /// Email a password-reset OTP.
    fn send_password_otp(
        &self,
        to_email: &str,
        to_name: &str,
        otp: &str,
    ) -> impl Future<Output = Result<(), EmailError>> + Send;
}

impl Mailer for EmailService {
    fn send_password_otp(
        &self,
        to_email: &str,
        to_name: &str,
        otp: &str,
    ) -> impl Future<Output = Result<(), EmailError>> + Send {
        Self::send_password_otp(self, to_email, to_name, otp)
    }
}

impl<M: Mailer> Mailer for Arc<M> {
    fn send_password_otp(
        &self,
        to_email: &str,
        to_name: &str,
        otp: &str,
    ) -> impl Future<Output = Result<(), EmailError>> + Send {
        (**self).send_password_otp(to_email, to_name, otp)
    }
}

/// A fresh four-digit OTP.
fn generate_otp() -> String {
    rand::rng().random_range(1000..10_000u32).to_string()
}

/// Admin account operations.
pub struct AccountService<S, M> {
    store: S,
    mailer: M,
    jwt: Arc<JwtService>,
}

impl<S: AdminStore, M: Mailer> AccountService<S, M> {
    /// Create a new account service.
    pub const fn new(store: S, mailer: M, jwt: Arc<JwtService>) -> Self {
        Self { store, mailer, jwt }
    }

    /// Register a new admin.
    ///
    /// # Errors
    ///
    /// `Invalid` when name, email or password is missing; `AlreadyExists`
    /// when the email is taken.
    pub async fn register(&self, input: RegisterInput) -> Result<Admin, AccountError> {
        let name = non_blank(input.name);
        let email = normalize_email(input.email.as_deref());
        let password = input.password.filter(|p| !p.is_empty());
        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(AccountError::invalid("Provide required data"));
        };

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AccountError::AlreadyExists);
        }

        let admin = self
            .store
            .insert(NewAdmin {
                name,
                email,
                avatar: non_blank(input.avatar),
                password_hash: hash_password(&password)?,
            })
            .await?;

        info!(admin_id = %admin.id, "Admin registered");
        Ok(admin)
    }

    /// Check credentials and issue a token.
    ///
    /// # Errors
    ///
    /// `Invalid` when email or password is missing; `InvalidCredentials`
    /// for an unknown email or a wrong password.
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutcome, AccountError> {
        let email = normalize_email(input.email.as_deref());
        let password = input.password.filter(|p| !p.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(AccountError::invalid("Provide required data"));
        };

        let record = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !verify_password(&password, &record.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.jwt.generate_token(record.profile.id)?;
        info!(admin_id = %record.profile.id, "Admin logged in");

        Ok(LoginOutcome {
            token,
            admin: record.profile,
        })
    }

    /// Fetch an admin's profile.
    ///
    /// # Errors
    ///
    /// `NotFound` when no admin has this ID.
    pub async fn profile(&self, id: Uuid) -> Result<Admin, AccountError> {
        self.principal(id).await?.ok_or(AccountError::NotFound)
    }

    /// Resolve a token subject to an admin, if it still exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn principal(&self, id: Uuid) -> Result<Option<Admin>, AccountError> {
        Ok(self.store.find_by_id(id).await?.map(|r| r.profile))
    }

    /// Update the signed-in admin's profile.
    ///
    /// A password change needs both the old and the new password.
    ///
    /// # Errors
    ///
    /// `Invalid` when only one password is given, `WrongPassword` when the
    /// old one does not match, `EmailTaken` when the new email belongs to
    /// another admin and `NotFound` when the admin is gone.
    pub async fn update_profile(
        &self,
        id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<Admin, AccountError> {
        let record = self.store.find_by_id(id).await?.ok_or(AccountError::NotFound)?;

        let old_password = input.old_password.filter(|p| !p.is_empty());
        let new_password = input.new_password.filter(|p| !p.is_empty());
        let password_hash = match (old_password, new_password) {
            (Some(old), Some(new)) => {
                if !verify_password(&old, &record.password_hash)? {
                    return Err(AccountError::WrongPassword);
                }
                Some(hash_password(&new)?)
            }
            (None, None) => None,
            _ => {
                return Err(AccountError::invalid(
                    "Both old and new passwords are required to change password",
                ));
            }
        };

        let email = normalize_email(input.email.as_deref()).filter(|e| *e != record.profile.email);
        if let Some(email) = &email {
            if let Some(other) = self.store.find_by_email(email).await? {
                if other.profile.id != id {
                    return Err(AccountError::EmailTaken);
                }
            }
        }

        let changes = AdminChanges {
            name: non_blank(input.name),
            email,
            avatar: non_blank(input.avatar),
            password_hash,
        };
        let admin = self.store.update(id, changes).await?;

        info!(admin_id = %id, "Admin profile updated");
        Ok(admin)
    }

    /// Email a password-reset OTP and return it.
    ///
    /// The code is not stored; [`Self::reset_password`] does not check it.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown email, `Mail` when delivery fails.
    pub async fn send_otp(&self, email: &str) -> Result<String, AccountError> {
        let email = normalize_email(Some(email)).ok_or(AccountError::NotFound)?;
        let record = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::NotFound)?;

        let otp = generate_otp();
        self.mailer
            .send_password_otp(&record.profile.email, &record.profile.name, &otp)
            .await?;

        info!(admin_id = %record.profile.id, "Password reset OTP sent");
        Ok(otp)
    }

    /// Set a new password for the admin with this email.
    ///
    /// # Errors
    ///
    /// `Invalid` when a field is missing, `NotFound` for an unknown email.
    pub async fn reset_password(&self, input: ResetPasswordInput) -> Result<(), AccountError> {
        let email = normalize_email(input.email.as_deref());
        let new_password = input.new_password.filter(|p| !p.is_empty());
        let (Some(email), Some(new_password)) = (email, new_password) else {
            return Err(AccountError::invalid("Email and new password are required"));
        };

        let record = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::NotFound)?;

        self.store
            .update(
                record.profile.id,
                AdminChanges {
                    password_hash: Some(hash_password(&new_password)?),
                    ..AdminChanges::default()
                },
            )
            .await?;

        info!(admin_id = %record.profile.id, "Admin password reset");
        Ok(())
    }
}
