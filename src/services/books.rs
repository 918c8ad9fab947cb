//! Book service

use crate::{
    error::AppResult,
    models::{Book, BookPatch, BookRequest, EntityId, EntityKind},
    repository::Repository,
    services::{
        merge,
        mutation::{ensure_target_exists, precheck, Mutation},
        relations::{self, BookRegistrations, CategoryBooks},
        unit_of_work::UnitOfWork,
    },
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book under a fresh id
    pub async fn create(&self, request: BookRequest) -> AppResult<Book> {
        tracing::debug!("REST request to save Book : {:?}", request);
        precheck(Mutation::Create, &request)?;

        let mut uow = UnitOfWork::begin(&self.repository).await?;
        let id = uow.next_id().await?;
        uow.catalog.put_book(request.to_record(id));
        self.link(&mut uow, id, &request).await?;

        let book = uow.book(id)?;
        uow.commit().await?;
        tracing::info!("Created Book {}", id);
        Ok(book)
    }

    /// Overwrite an existing book; omitted optional fields become empty
    pub async fn replace(&self, path_id: EntityId, request: BookRequest) -> AppResult<Book> {
        tracing::debug!("REST request to update Book : {}, {:?}", path_id, request);
        let intent = precheck(Mutation::Replace { path_id }, &request)?;

        let mut uow = UnitOfWork::begin(&self.repository).await?;
        ensure_target_exists(&mut uow, EntityKind::Book, intent).await?;
        uow.load_children::<BookRegistrations>(path_id).await?;

        let previous = uow.book(path_id)?;
        let mut record = request.to_record(path_id);
        record.book_registrations = previous.book_registrations;
        uow.catalog.put_book(record);
        self.link(&mut uow, path_id, &request).await?;

        let book = uow.book(path_id)?;
        uow.commit().await?;
        tracing::info!("Replaced Book {}", path_id);
        Ok(book)
    }

    /// Apply the fields present in `patch` to an existing book
    pub async fn merge(&self, path_id: EntityId, patch: BookPatch) -> AppResult<Book> {
        tracing::debug!("REST request to partial update Book partially : {}, {:?}", path_id, patch);
        let intent = precheck(Mutation::Merge { path_id }, &patch)?;

        let mut uow = UnitOfWork::begin(&self.repository).await?;
        ensure_target_exists(&mut uow, EntityKind::Book, intent).await?;

        if let Some(category) = patch.category_type.as_set() {
            uow.require(EntityKind::CategoryType, category.id).await?;
            uow.load_owners_of::<CategoryBooks>(path_id).await?;
        }
        if let Some(registrations) = patch.book_registrations.as_set() {
            uow.load_children::<BookRegistrations>(path_id).await?;
            let children = registrations.iter().copied().collect();
            uow.prepare_adoption::<BookRegistrations>(&children).await?;
        }

        merge::merge_book(&mut uow.catalog, path_id, &patch)?;

        let book = uow.book(path_id)?;
        uow.commit().await?;
        tracing::info!("Merged Book {}", path_id);
        Ok(book)
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        tracing::debug!("REST request to get all Books");
        let mut tx = self.repository.begin().await?;
        tx.list_books().await
    }

    /// Fetch one book; a missing id is `None`, not an error
    pub async fn get(&self, id: EntityId) -> AppResult<Option<Book>> {
        tracing::debug!("REST request to get Book : {}", id);
        let mut tx = self.repository.begin().await?;
        tx.get_book(id).await
    }

    /// Delete a book; its registrations and category lose their links to it
    pub async fn delete(&self, id: EntityId) -> AppResult<()> {
        tracing::debug!("REST request to delete Book : {}", id);
        let mut uow = UnitOfWork::begin(&self.repository).await?;
        if !uow.load(EntityKind::Book, id).await? {
            tracing::debug!("Book {} already absent", id);
            return Ok(());
        }

        uow.load_children::<BookRegistrations>(id).await?;
        relations::set_children::<BookRegistrations>(&mut uow.catalog, id, Default::default())?;
        uow.load_owners_of::<CategoryBooks>(id).await?;
        relations::detach_from_other_owners::<CategoryBooks>(&mut uow.catalog, id, None)?;

        uow.delete(EntityKind::Book, id);
        uow.commit().await?;
        tracing::info!("Deleted Book {}", id);
        Ok(())
    }

    /// Create/replace linking: the category is a plain reference write, the
    /// registrations go through the collection setter
    async fn link(&self, uow: &mut UnitOfWork, id: EntityId, request: &BookRequest) -> AppResult<()> {
        let category = request.category_type.map(|r| r.id);
        if let Some(category) = category {
            uow.require_exists(EntityKind::CategoryType, category).await?;
        }
        relations::set_owner::<CategoryBooks>(&mut uow.catalog, id, category)?;

        let registrations = request.registration_refs();
        uow.prepare_adoption::<BookRegistrations>(&registrations).await?;
        relations::adopt_children::<BookRegistrations>(&mut uow.catalog, id, registrations)
    }
}
