//! `SeaORM` Entity for products table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    /// Plain reference to a category term; there is no foreign key.
    pub category_id: Uuid,
    /// Plain reference to a material term; there is no foreign key.
    pub material_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub size: Option<String>,
    pub quantity_per_pack: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub price_per_pack: Option<Decimal>,
    /// JSON array of image URLs.
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
