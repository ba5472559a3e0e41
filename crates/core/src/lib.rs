//! Core business logic for Packline.
//!
//! This crate contains pure business logic with no web framework or database
//! dependencies. Stores are traits; the db crate implements them.
//!
//! # Modules
//!
//! - `catalog` - Generic CRUD, uniqueness and pagination for catalog resources
//! - `account` - Admin registration, login, profile and password reset
//! - `auth` - Password hashing
//! - `upload` - Multipart slot grammar, staged temp files, upload pipeline
//! - `storage` - Image hosts (Cloudinary, OpenDAL object stores)

pub mod account;
pub mod auth;
pub mod catalog;
pub mod storage;
pub mod upload;
