//! Catalog service: the create/list/get/update/delete flow every resource
//! shares.

use std::future::{Future, ready};
use std::marker::PhantomData;

use packline_shared::{Page, PageRequest, PageWindow};
use tracing::info;
use uuid::Uuid;

use super::error::CatalogError;
use super::resource::{CatalogStore, Resource};

/// CRUD with uniqueness checks and pagination over a [`CatalogStore`].
pub struct CatalogService<R, S> {
    store: S,
    _resource: PhantomData<fn() -> R>,
}

impl<R, S> CatalogService<R, S>
where
    R: Resource,
    S: CatalogStore<R>,
{
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create a record.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Duplicate` if the record's identity is taken.
    pub async fn create(&self, draft: R::Draft) -> Result<R, CatalogError> {
        self.create_with(draft, |draft| ready(Ok(draft))).await
    }

    /// Create a record, running `finalize` between the uniqueness check and
    /// the insert.
    ///
    /// Uploads go in `finalize` so nothing is pushed to the image host for a
    /// request that is going to conflict.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Duplicate` if the identity is taken, or whatever
    /// `finalize` fails with.
    pub async fn create_with<F, Fut>(&self, draft: R::Draft, finalize: F) -> Result<R, CatalogError>
    where
        F: FnOnce(R::Draft) -> Fut,
        Fut: Future<Output = Result<R::Draft, CatalogError>>,
    {
        if let Some(key) = R::draft_key(&draft) {
            self.ensure_unique(&key, None).await?;
        }

        let draft = finalize(draft).await?;
        let record = self.store.insert(draft).await?;

        info!(resource = self.store.label(), id = %record.id(), "Record created");
        Ok(record)
    }

    /// Fetch a record by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no record has this ID.
    pub async fn get(&self, id: Uuid) -> Result<R, CatalogError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(self.store.label(), id))
    }

    /// List records matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list(
        &self,
        filter: &R::Filter,
        request: PageRequest,
    ) -> Result<Page<R>, CatalogError> {
        let total = self.store.count(filter).await?;
        let items = self.store.list(filter, request.window()).await?;
        Ok(Page::new(items, &request, total))
    }

    /// The `n` newest records matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn latest(&self, filter: &R::Filter, n: u64) -> Result<Vec<R>, CatalogError> {
        self.store
            .list(filter, Some(PageWindow { offset: 0, limit: n }))
            .await
    }

    /// Count records matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn count(&self, filter: &R::Filter) -> Result<u64, CatalogError> {
        self.store.count(filter).await
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the record is missing, or
    /// `CatalogError::Duplicate` if the change collides with another record.
    pub async fn update(&self, id: Uuid, changes: R::Changes) -> Result<R, CatalogError> {
        self.update_with(id, changes, |_, changes| ready(Ok(changes)))
            .await
    }

    /// Apply a partial update, running `finalize` after the record is found
    /// and the uniqueness check passes.
    ///
    /// # Errors
    ///
    /// As [`Self::update`], plus whatever `finalize` fails with.
    pub async fn update_with<F, Fut>(
        &self,
        id: Uuid,
        changes: R::Changes,
        finalize: F,
    ) -> Result<R, CatalogError>
    where
        F: FnOnce(R, R::Changes) -> Fut,
        Fut: Future<Output = Result<R::Changes, CatalogError>>,
    {
        let current = self.get(id).await?;

        if let Some(key) = current.changed_key(&changes) {
            self.ensure_unique(&key, Some(id)).await?;
        }

        let changes = finalize(current.clone(), changes).await?;
        let record = self.store.update(current, changes).await?;

        info!(resource = self.store.label(), id = %id, "Record updated");
        Ok(record)
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no record has this ID.
    pub async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        if !self.store.delete(id).await? {
            return Err(CatalogError::not_found(self.store.label(), id));
        }

        info!(resource = self.store.label(), id = %id, "Record deleted");
        Ok(())
    }

    async fn ensure_unique(&self, key: &R::Key, exclude: Option<Uuid>) -> Result<(), CatalogError> {
        match self.store.find_duplicate(key, exclude).await? {
            Some(_) => Err(CatalogError::Duplicate {
                label: self.store.label(),
                key: key.to_string(),
            }),
            None => Ok(()),
        }
    }
}
