//! Products.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::error::CatalogError;
use super::fields::FormFields;
use super::resource::Resource;

/// Number of products shown on the storefront home page.
pub const HOME_PRODUCT_COUNT: u64 = 8;

/// A product listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: Uuid,
    /// Display name, unique within its category and material.
    pub name: String,
    /// Category term ID.
    #[serde(rename = "category")]
    pub category_id: Uuid,
    /// Material term ID.
    #[serde(rename = "material")]
    pub material_id: Uuid,
    /// Free-form size label.
    pub size: Option<String>,
    /// Units per pack.
    pub quantity_per_pack: i32,
    /// Price of one pack.
    pub price_per_pack: Option<Decimal>,
    /// Image URLs, in display order.
    pub images: Vec<String>,
    /// Long description.
    pub description: Option<String>,
    /// Whether the product is listed.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A validated new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category_id: Uuid,
    pub material_id: Uuid,
    pub size: Option<String>,
    pub quantity_per_pack: i32,
    pub price_per_pack: Option<Decimal>,
    /// Filled in after upload.
    pub images: Vec<String>,
    pub description: Option<String>,
    pub is_active: bool,
}

/// A validated partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub size: Option<String>,
    pub quantity_per_pack: Option<i32>,
    pub price_per_pack: Option<Decimal>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// List filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub is_active: Option<bool>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}

/// The (name, category, material) triple a product claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductKey {
    /// Compared case-insensitively.
    pub name: String,
    pub category_id: Uuid,
    pub material_id: Uuid,
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("with this name, category, and material")
    }
}

impl Resource for Product {
    type Draft = ProductDraft;
    type Changes = ProductChanges;
    type Filter = ProductFilter;
    type Key = ProductKey;

    fn id(&self) -> Uuid {
        self.id
    }

    fn draft_key(draft: &ProductDraft) -> Option<ProductKey> {
        Some(ProductKey {
            name: draft.name.clone(),
            category_id: draft.category_id,
            material_id: draft.material_id,
        })
    }

    fn changed_key(&self, changes: &ProductChanges) -> Option<ProductKey> {
        if changes.name.is_none()
            && changes.category_id.is_none()
            && changes.material_id.is_none()
        {
            return None;
        }
        Some(ProductKey {
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            category_id: changes.category_id.unwrap_or(self.category_id),
            material_id: changes.material_id.unwrap_or(self.material_id),
        })
    }
}

/// Product fields as sent by the admin dashboard, coerced but not yet
/// checked for completeness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub size: Option<String>,
    pub quantity_per_pack: Option<i32>,
    pub price_per_pack: Option<Decimal>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    /// Image URLs to keep on update. `None` keeps all current images.
    pub existing_images: Option<Vec<String>>,
}

impl ProductForm {
    /// Coerce raw fields.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` naming the first malformed field.
    pub fn parse(fields: &FormFields) -> Result<Self, CatalogError> {
        Ok(Self {
            name: fields.non_blank("name").map(String::from),
            category_id: parse_id(fields, "category")?,
            material_id: parse_id(fields, "material")?,
            size: fields.non_blank("size").map(String::from),
            quantity_per_pack: parse_quantity(fields)?,
            price_per_pack: parse_price(fields)?,
            description: fields.non_blank("description").map(String::from),
            is_active: fields.flag("isActive")?,
            existing_images: fields.list("existingImages"),
        })
    }

    /// Check required fields and apply defaults for create.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` when name, category or material is
    /// missing.
    pub fn into_draft(self) -> Result<ProductDraft, CatalogError> {
        let name = self.name.ok_or_else(|| CatalogError::invalid("name is required"))?;
        let category_id = self
            .category_id
            .ok_or_else(|| CatalogError::invalid("category is required"))?;
        let material_id = self
            .material_id
            .ok_or_else(|| CatalogError::invalid("material is required"))?;

        Ok(ProductDraft {
            name,
            category_id,
            material_id,
            size: self.size,
            quantity_per_pack: self.quantity_per_pack.unwrap_or(1),
            price_per_pack: self.price_per_pack,
            images: Vec::new(),
            description: self.description,
            is_active: self.is_active.unwrap_or(true),
        })
    }

    /// Split into field changes and the list of images to keep.
    #[must_use]
    pub fn into_update(self) -> (ProductChanges, Option<Vec<String>>) {
        let changes = ProductChanges {
            name: self.name,
            category_id: self.category_id,
            material_id: self.material_id,
            size: self.size,
            quantity_per_pack: self.quantity_per_pack,
            price_per_pack: self.price_per_pack,
            images: None,
            description: self.description,
            is_active: self.is_active,
        };
        (changes, self.existing_images)
    }
}

/// New image list after an update: the kept images followed by the uploads.
///
/// Without an explicit keep list the current images are all kept.
#[must_use]
pub fn merge_images(
    current: &[String],
    keep: Option<Vec<String>>,
    uploaded: Vec<String>,
) -> Vec<String> {
    let mut images = keep.unwrap_or_else(|| current.to_vec());
    images.extend(uploaded);
    images
}

fn parse_id(fields: &FormFields, name: &str) -> Result<Option<Uuid>, CatalogError> {
    fields
        .non_blank(name)
        .map(|raw| {
            Uuid::parse_str(raw)
                .map_err(|_| CatalogError::invalid(format!("{name} must be a valid id")))
        })
        .transpose()
}

fn parse_quantity(fields: &FormFields) -> Result<Option<i32>, CatalogError> {
    fields
        .non_blank("quantityPerPack")
        .map(|raw| match raw.parse::<i32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(CatalogError::invalid("quantityPerPack must be a positive integer")),
        })
        .transpose()
}

/// Largest price a `NUMERIC(12, 2)` column holds.
const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2); // 999_999_999_999 * 10^-2

fn parse_price(fields: &FormFields) -> Result<Option<Decimal>, CatalogError> {
    fields
        .non_blank("pricePerPack")
        .map(|raw| match Decimal::from_str(raw).map(|p| p.round_dp(2)) {
            Ok(price) if price.is_sign_negative() => {
                Err(CatalogError::invalid("pricePerPack must not be negative"))
            }
            Ok(price) if price > MAX_PRICE => Err(CatalogError::invalid(format!(
                "pricePerPack must not exceed {MAX_PRICE}"
            ))),
            Ok(price) => Ok(price),
            Err(_) => Err(CatalogError::invalid("pricePerPack must be a number")),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn fields(body: &serde_json::Value) -> FormFields {
        FormFields::from_json(body).unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let category = Uuid::new_v4();
        let material = Uuid::new_v4();
        let form = ProductForm::parse(&fields(&json!({
            "name": " Mailer Box ",
            "category": category.to_string(),
            "material": material.to_string(),
        })))
        .unwrap();
        let draft = form.into_draft().unwrap();

        assert_eq!(draft.name, "Mailer Box");
        assert_eq!(draft.category_id, category);
        assert_eq!(draft.quantity_per_pack, 1);
        assert!(draft.is_active);
        assert!(draft.images.is_empty());
    }

    #[test]
    fn test_create_requires_triple() {
        let form = ProductForm::parse(&fields(&json!({"name": "Tape"}))).unwrap();
        assert_eq!(form.into_draft().unwrap_err().to_string(), "category is required");
    }

    #[test]
    fn test_rejects_malformed_fields() {
        let err = ProductForm::parse(&fields(&json!({"category": "boxes"}))).unwrap_err();
        assert_eq!(err.to_string(), "category must be a valid id");

        let err = ProductForm::parse(&fields(&json!({"quantityPerPack": "0"}))).unwrap_err();
        assert_eq!(err.to_string(), "quantityPerPack must be a positive integer");

        let err = ProductForm::parse(&fields(&json!({"pricePerPack": "-1"}))).unwrap_err();
        assert_eq!(err.to_string(), "pricePerPack must not be negative");
    }

    #[test]
    fn test_price_is_decimal() {
        let form = ProductForm::parse(&fields(&json!({"pricePerPack": "149.999"}))).unwrap();
        assert_eq!(form.price_per_pack, Some(dec!(150.00)));

        let form = ProductForm::parse(&fields(&json!({"pricePerPack": 12.5}))).unwrap();
        assert_eq!(form.price_per_pack, Some(dec!(12.5)));
    }

    #[test]
    fn test_price_must_fit_column() {
        let form = ProductForm::parse(&fields(&json!({"pricePerPack": "9999999999.99"}))).unwrap();
        assert_eq!(form.price_per_pack, Some(dec!(9999999999.99)));

        for raw in ["99999999999", "10000000000", "9999999999.999"] {
            let err = ProductForm::parse(&fields(&json!({"pricePerPack": raw}))).unwrap_err();
            assert_eq!(err.to_string(), "pricePerPack must not exceed 9999999999.99");
        }
    }

    #[test]
    fn test_update_keeps_existing_images_list() {
        let form = ProductForm::parse(&fields(&json!({
            "existingImages": "https://cdn/a.png",
            "isActive": "false"
        })))
        .unwrap();
        let (changes, keep) = form.into_update();
        assert_eq!(changes.is_active, Some(false));
        assert_eq!(changes.name, None);
        assert_eq!(keep, Some(vec!["https://cdn/a.png".to_string()]));
    }

    #[test]
    fn test_merge_images() {
        let current = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            merge_images(&current, None, vec!["c".into()]),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            merge_images(&current, Some(vec!["b".into()]), vec!["c".into()]),
            vec!["b", "c"]
        );
        assert!(merge_images(&current, Some(vec![]), vec![]).is_empty());
    }

    #[test]
    fn test_changed_key_fills_from_current() {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: "Mailer Box".into(),
            category_id: Uuid::new_v4(),
            material_id: Uuid::new_v4(),
            size: None,
            quantity_per_pack: 10,
            price_per_pack: None,
            images: vec![],
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        assert!(product.changed_key(&ProductChanges {
            is_active: Some(false),
            ..ProductChanges::default()
        })
        .is_none());

        let other_material = Uuid::new_v4();
        let key = product
            .changed_key(&ProductChanges {
                material_id: Some(other_material),
                ..ProductChanges::default()
            })
            .unwrap();
        assert_eq!(key.name, "Mailer Box");
        assert_eq!(key.category_id, product.category_id);
        assert_eq!(key.material_id, other_material);
    }

    #[test]
    fn test_serializes_reference_names() {
        let now = Utc::now();
        let product = Product {
            id: Uuid::nil(),
            name: "Tape".into(),
            category_id: Uuid::nil(),
            material_id: Uuid::nil(),
            size: Some("48mm".into()),
            quantity_per_pack: 6,
            price_per_pack: Some(dec!(9.99)),
            images: vec![],
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("category").is_some());
        assert!(value.get("material").is_some());
        assert_eq!(value["quantityPerPack"], 6);
    }
}
