//! Admin accounts.
//!
//! There is one kind of principal, the admin. Tokens carry the admin ID as
//! `sub`; password-reset OTPs are mailed and returned but never stored.

mod error;
mod service;
mod types;

pub use error::AccountError;
pub use service::{AccountService, AdminStore, Mailer};
pub use types::{
    Admin, AdminChanges, AdminRecord, LoginInput, LoginOutcome, NewAdmin, RegisterInput,
    ResetPasswordInput, UpdateProfileInput,
};
