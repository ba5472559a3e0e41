//! Taxonomy term repository: categories, materials and sizes.
//!
//! One repository instance serves one kind; every query is scoped by it.

use chrono::Utc;
use packline_core::catalog::{
    CatalogError, CatalogStore, TaxonomyKind, Term, TermChanges, TermDraft, TermFilter, TermKey,
};
use packline_shared::PageWindow;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, Unchanged,
};
use uuid::Uuid;

use super::query::{contains_ci, db_error, lower_eq, update_error, windowed};
use crate::entities::{sea_orm_active_enums::TermKind, taxonomy_terms};

/// Taxonomy repository for one term kind.
#[derive(Debug, Clone)]
pub struct TermRepository {
    db: DatabaseConnection,
    kind: TaxonomyKind,
}

impl TermRepository {
    /// Creates a repository for `kind`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, kind: TaxonomyKind) -> Self {
        Self { db, kind }
    }

    /// The kind this repository serves.
    #[must_use]
    pub const fn kind(&self) -> TaxonomyKind {
        self.kind
    }

    fn scoped(&self) -> Select<taxonomy_terms::Entity> {
        taxonomy_terms::Entity::find()
            .filter(taxonomy_terms::Column::Kind.eq(to_db_kind(self.kind)))
    }

    fn filtered(&self, filter: &TermFilter) -> Select<taxonomy_terms::Entity> {
        let mut query = self.scoped();
        if let Some(search) = &filter.search {
            query = query.filter(contains_ci(taxonomy_terms::Column::Name, search));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(taxonomy_terms::Column::IsActive.eq(is_active));
        }
        query
    }
}

impl CatalogStore<Term> for TermRepository {
    fn label(&self) -> &'static str {
        self.kind.label()
    }

    async fn insert(&self, draft: TermDraft) -> Result<Term, CatalogError> {
        let now = Utc::now().into();
        let model = taxonomy_terms::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(to_db_kind(self.kind)),
            name: Set(draft.name),
            is_active: Set(draft.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Term>, CatalogError> {
        let model = self
            .scoped()
            .filter(taxonomy_terms::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(to_domain))
    }

    async fn find_duplicate(
        &self,
        key: &TermKey,
        exclude: Option<Uuid>,
    ) -> Result<Option<Term>, CatalogError> {
        let mut query = self
            .scoped()
            .filter(lower_eq(taxonomy_terms::Column::Name, &key.0));
        if let Some(id) = exclude {
            query = query.filter(taxonomy_terms::Column::Id.ne(id));
        }

        let model = query.one(&self.db).await.map_err(db_error)?;
        Ok(model.map(to_domain))
    }

    async fn count(&self, filter: &TermFilter) -> Result<u64, CatalogError> {
        self.filtered(filter).count(&self.db).await.map_err(db_error)
    }

    async fn list(
        &self,
        filter: &TermFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Term>, CatalogError> {
        let query = self
            .filtered(filter)
            .order_by_desc(taxonomy_terms::Column::CreatedAt);

        let models = windowed(query, window)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(&self, current: Term, changes: TermChanges) -> Result<Term, CatalogError> {
        let mut model = taxonomy_terms::ActiveModel {
            id: Unchanged(current.id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(is_active) = changes.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| update_error(e, self.label(), current.id))?;

        Ok(to_domain(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let result = taxonomy_terms::Entity::delete_many()
            .filter(taxonomy_terms::Column::Id.eq(id))
            .filter(taxonomy_terms::Column::Kind.eq(to_db_kind(self.kind)))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }
}

const fn to_db_kind(kind: TaxonomyKind) -> TermKind {
    match kind {
        TaxonomyKind::Category => TermKind::Category,
        TaxonomyKind::Material => TermKind::Material,
        TaxonomyKind::Size => TermKind::Size,
    }
}

const fn from_db_kind(kind: TermKind) -> TaxonomyKind {
    match kind {
        TermKind::Category => TaxonomyKind::Category,
        TermKind::Material => TaxonomyKind::Material,
        TermKind::Size => TaxonomyKind::Size,
    }
}

fn to_domain(model: taxonomy_terms::Model) -> Term {
    Term {
        id: model.id,
        kind: from_db_kind(model.kind),
        name: model.name,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping_round_trips() {
        for kind in TaxonomyKind::ALL {
            assert_eq!(from_db_kind(to_db_kind(kind)), kind);
        }
    }
}
