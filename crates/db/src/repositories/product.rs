//! Product repository.

use chrono::Utc;
use packline_core::catalog::{
    CatalogError, CatalogStore, Product, ProductChanges, ProductDraft, ProductFilter, ProductKey,
};
use packline_shared::PageWindow;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, Unchanged,
};
use uuid::Uuid;

use super::query::{contains_ci, db_error, json_list, lower_eq, update_error, windowed};
use crate::entities::products;

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(filter: &ProductFilter) -> Select<products::Entity> {
        let mut query = products::Entity::find();
        if let Some(category_id) = filter.category_id {
            query = query.filter(products::Column::CategoryId.eq(category_id));
        }
        if let Some(material_id) = filter.material_id {
            query = query.filter(products::Column::MaterialId.eq(material_id));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(products::Column::IsActive.eq(is_active));
        }
        if let Some(name) = &filter.name {
            query = query.filter(contains_ci(products::Column::Name, name));
        }
        query
    }
}

impl CatalogStore<Product> for ProductRepository {
    fn label(&self) -> &'static str {
        "Product"
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let now = Utc::now().into();
        let model = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(draft.name),
            category_id: Set(draft.category_id),
            material_id: Set(draft.material_id),
            size: Set(draft.size),
            quantity_per_pack: Set(draft.quantity_per_pack),
            price_per_pack: Set(draft.price_per_pack),
            images: Set(draft.images.into()),
            description: Set(draft.description),
            is_active: Set(draft.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(to_domain))
    }

    async fn find_duplicate(
        &self,
        key: &ProductKey,
        exclude: Option<Uuid>,
    ) -> Result<Option<Product>, CatalogError> {
        let mut query = products::Entity::find()
            .filter(lower_eq(products::Column::Name, &key.name))
            .filter(products::Column::CategoryId.eq(key.category_id))
            .filter(products::Column::MaterialId.eq(key.material_id));
        if let Some(id) = exclude {
            query = query.filter(products::Column::Id.ne(id));
        }

        let model = query.one(&self.db).await.map_err(db_error)?;
        Ok(model.map(to_domain))
    }

    async fn count(&self, filter: &ProductFilter) -> Result<u64, CatalogError> {
        Self::filtered(filter).count(&self.db).await.map_err(db_error)
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Product>, CatalogError> {
        let query = Self::filtered(filter).order_by_desc(products::Column::CreatedAt);

        let models = windowed(query, window)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(
        &self,
        current: Product,
        changes: ProductChanges,
    ) -> Result<Product, CatalogError> {
        let mut model = products::ActiveModel {
            id: Unchanged(current.id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(category_id) = changes.category_id {
            model.category_id = Set(category_id);
        }
        if let Some(material_id) = changes.material_id {
            model.material_id = Set(material_id);
        }
        if let Some(size) = changes.size {
            model.size = Set(Some(size));
        }
        if let Some(quantity) = changes.quantity_per_pack {
            model.quantity_per_pack = Set(quantity);
        }
        if let Some(price) = changes.price_per_pack {
            model.price_per_pack = Set(Some(price));
        }
        if let Some(images) = changes.images {
            model.images = Set(images.into());
        }
        if let Some(description) = changes.description {
            model.description = Set(Some(description));
        }
        if let Some(is_active) = changes.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| update_error(e, "Product", current.id))?;

        Ok(to_domain(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let result = products::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }
}

fn to_domain(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        category_id: model.category_id,
        material_id: model.material_id,
        size: model.size,
        quantity_per_pack: model.quantity_per_pack,
        price_per_pack: model.price_per_pack,
        images: json_list(model.images),
        description: model.description,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
