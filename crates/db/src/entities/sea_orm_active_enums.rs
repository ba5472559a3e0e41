//! Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `term_kind` enum discriminating rows of `taxonomy_terms`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "term_kind")]
pub enum TermKind {
    /// A product category.
    #[sea_orm(string_value = "category")]
    Category,
    /// A product material.
    #[sea_orm(string_value = "material")]
    Material,
    /// A product size.
    #[sea_orm(string_value = "size")]
    Size,
}
