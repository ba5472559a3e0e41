//! Shared types, errors, and configuration for Packline.
//!
//! This crate provides the pieces every other crate leans on:
//! - Application-wide error types
//! - Configuration management
//! - Pagination types for list endpoints
//! - JWT issuing and validation
//! - Transactional email over SMTP

pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;

pub use config::{AppConfig, EmailConfig, ImageConfig, ImageProviderConfig, JwtConfig};
pub use email::{ContactForm, EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use jwt::{Claims, JwtError, JwtService};
pub use types::{Page, PageMeta, PageRequest, PageWindow};
