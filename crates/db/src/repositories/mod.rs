//! Repository abstractions for data access.
//!
//! Each repository implements a store trait from `packline-core`, hiding the
//! `SeaORM` details from the services that use it.

pub mod admin;
pub mod blog;
pub mod contact;
pub mod product;
mod query;
pub mod term;

pub use admin::AdminRepository;
pub use blog::BlogRepository;
pub use contact::ContactRepository;
pub use product::ProductRepository;
pub use term::TermRepository;
