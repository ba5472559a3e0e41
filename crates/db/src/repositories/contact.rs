//! Contact query repository.
//!
//! Contact queries are only created and listed; updates are uninhabited.

use std::convert::Infallible;

use chrono::Utc;
use packline_core::catalog::{
    CatalogError, CatalogStore, ContactDraft, ContactFilter, ContactQuery, ContactSearch,
};
use packline_shared::PageWindow;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::query::{contains_ci, db_error, windowed};
use crate::entities::contact_queries;

/// Contact query repository.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    db: DatabaseConnection,
}

impl ContactRepository {
    /// Creates a new contact repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(filter: &ContactFilter) -> Select<contact_queries::Entity> {
        let query = contact_queries::Entity::find();
        match &filter.search {
            Some(ContactSearch::Phone(digits)) => {
                query.filter(contact_queries::Column::Phone.contains(digits.as_str()))
            }
            Some(ContactSearch::Text(text)) => query.filter(
                Condition::any()
                    .add(contains_ci(contact_queries::Column::FirstName, text))
                    .add(contains_ci(contact_queries::Column::LastName, text))
                    .add(contains_ci(contact_queries::Column::Email, text))
                    .add(contains_ci(contact_queries::Column::Message, text)),
            ),
            None => query,
        }
    }
}

impl CatalogStore<ContactQuery> for ContactRepository {
    fn label(&self) -> &'static str {
        "Contact query"
    }

    async fn insert(&self, draft: ContactDraft) -> Result<ContactQuery, CatalogError> {
        let now = Utc::now().into();
        let model = contact_queries::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(draft.first_name),
            last_name: Set(draft.last_name),
            email: Set(draft.email),
            phone: Set(draft.phone),
            message: Set(draft.message),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContactQuery>, CatalogError> {
        let model = contact_queries::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(to_domain))
    }

    async fn find_duplicate(
        &self,
        key: &Infallible,
        _exclude: Option<Uuid>,
    ) -> Result<Option<ContactQuery>, CatalogError> {
        match *key {}
    }

    async fn count(&self, filter: &ContactFilter) -> Result<u64, CatalogError> {
        Self::filtered(filter).count(&self.db).await.map_err(db_error)
    }

    async fn list(
        &self,
        filter: &ContactFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<ContactQuery>, CatalogError> {
        let query = Self::filtered(filter).order_by_desc(contact_queries::Column::CreatedAt);

        let models = windowed(query, window)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(
        &self,
        _current: ContactQuery,
        changes: Infallible,
    ) -> Result<ContactQuery, CatalogError> {
        match changes {}
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let result = contact_queries::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }
}

fn to_domain(model: contact_queries::Model) -> ContactQuery {
    ContactQuery {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        message: model.message,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
