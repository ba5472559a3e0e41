//! Blog repository.

use std::convert::Infallible;

use chrono::Utc;
use packline_core::catalog::{
    Blog, BlogChanges, BlogDraft, BlogFilter, CatalogError, CatalogStore,
};
use packline_shared::PageWindow;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, Unchanged,
};
use uuid::Uuid;

use super::query::{contains_ci, db_error, json_list, update_error, windowed};
use crate::entities::blogs;

/// Blog repository.
#[derive(Debug, Clone)]
pub struct BlogRepository {
    db: DatabaseConnection,
}

impl BlogRepository {
    /// Creates a new blog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(filter: &BlogFilter) -> Select<blogs::Entity> {
        let mut query = blogs::Entity::find();
        if let Some(is_active) = filter.is_active {
            query = query.filter(blogs::Column::IsActive.eq(is_active));
        }
        if let Some(search) = &filter.search {
            query = query.filter(contains_ci(blogs::Column::Title, search));
        }
        query
    }
}

impl CatalogStore<Blog> for BlogRepository {
    fn label(&self) -> &'static str {
        "Blog"
    }

    async fn insert(&self, draft: BlogDraft) -> Result<Blog, CatalogError> {
        let content = serde_json::to_value(&draft.content)
            .map_err(|e| CatalogError::repository(e.to_string()))?;
        let now = Utc::now().into();
        let model = blogs::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(draft.title),
            description: Set(draft.description),
            images: Set(draft.images.into()),
            content: Set(content),
            is_active: Set(draft.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, CatalogError> {
        let model = blogs::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(to_domain))
    }

    async fn find_duplicate(
        &self,
        key: &Infallible,
        _exclude: Option<Uuid>,
    ) -> Result<Option<Blog>, CatalogError> {
        match *key {}
    }

    async fn count(&self, filter: &BlogFilter) -> Result<u64, CatalogError> {
        Self::filtered(filter).count(&self.db).await.map_err(db_error)
    }

    async fn list(
        &self,
        filter: &BlogFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Blog>, CatalogError> {
        let query = Self::filtered(filter).order_by_desc(blogs::Column::CreatedAt);

        let models = windowed(query, window)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(&self, current: Blog, changes: BlogChanges) -> Result<Blog, CatalogError> {
        let mut model = blogs::ActiveModel {
            id: Unchanged(current.id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(description) = changes.description {
            model.description = Set(description);
        }
        if let Some(images) = changes.images {
            model.images = Set(images.into());
        }
        if let Some(content) = changes.content {
            let content = serde_json::to_value(&content)
                .map_err(|e| CatalogError::repository(e.to_string()))?;
            model.content = Set(content);
        }
        if let Some(is_active) = changes.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| update_error(e, "Blog", current.id))?;

        Ok(to_domain(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let result = blogs::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }
}

fn to_domain(model: blogs::Model) -> Blog {
    Blog {
        id: model.id,
        title: model.title,
        description: model.description,
        images: json_list(model.images),
        content: json_list(model.content),
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
