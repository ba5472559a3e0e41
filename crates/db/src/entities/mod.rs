//! `SeaORM` entity definitions.
//!
//! One module per table. Domain conversions live in the repositories.

pub mod admins;
pub mod blogs;
pub mod contact_queries;
pub mod products;
pub mod sea_orm_active_enums;
pub mod taxonomy_terms;
