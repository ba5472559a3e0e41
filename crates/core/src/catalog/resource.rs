//! The shape every catalog resource shares, and the store trait the db crate
//! implements for each of them.

use std::fmt;
use std::future::Future;

use packline_shared::PageWindow;
use uuid::Uuid;

use super::error::CatalogError;

/// A catalog record type.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Validated input for a new record.
    type Draft: Send;
    /// Validated partial update.
    type Changes: Send;
    /// List filter.
    type Filter: Default + Send + Sync;
    /// Identity used for duplicate detection.
    type Key: fmt::Display + Send + Sync;

    /// The record's ID.
    fn id(&self) -> Uuid;

    /// Identity a new record would claim, if the resource enforces one.
    fn draft_key(draft: &Self::Draft) -> Option<Self::Key>;

    /// Identity after applying `changes`, when they touch identity fields.
    fn changed_key(&self, changes: &Self::Changes) -> Option<Self::Key>;
}

/// Persistence for one resource type.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait CatalogStore<R: Resource>: Send + Sync {
    /// Label used in messages, e.g. "Category".
    fn label(&self) -> &'static str;

    /// Insert a new record.
    fn insert(&self, draft: R::Draft) -> impl Future<Output = Result<R, CatalogError>> + Send;

    /// Find a record by ID.
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<R>, CatalogError>> + Send;

    /// Find a record whose identity matches `key` case-insensitively,
    /// ignoring `exclude`.
    fn find_duplicate(
        &self,
        key: &R::Key,
        exclude: Option<Uuid>,
    ) -> impl Future<Output = Result<Option<R>, CatalogError>> + Send;

    /// Count records matching `filter`.
    fn count(&self, filter: &R::Filter) -> impl Future<Output = Result<u64, CatalogError>> + Send;

    /// List records matching `filter`, newest first.
    fn list(
        &self,
        filter: &R::Filter,
        window: Option<PageWindow>,
    ) -> impl Future<Output = Result<Vec<R>, CatalogError>> + Send;

    /// Apply `changes` to `current` and persist.
    fn update(
        &self,
        current: R,
        changes: R::Changes,
    ) -> impl Future<Output = Result<R, CatalogError>> + Send;

    /// Delete by ID; `false` when nothing was deleted.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, CatalogError>> + Send;
}
