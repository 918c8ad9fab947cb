//! Book registration (loan record) service

use crate::{
    error::AppResult,
    models::{BookRegistration, BookRegistrationPatch, BookRegistrationRequest, EntityId, EntityKind},
    repository::Repository,
    services::{
        merge,
        mutation::{ensure_target_exists, precheck, Mutation},
        relations::{self, BookRegistrations},
        unit_of_work::UnitOfWork,
    },
};

#[derive(Clone)]
pub struct BookRegistrationsService {
    repository: Repository,
}

impl BookRegistrationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: BookRegistrationRequest) -> AppResult<BookRegistration> {
        tracing::debug!("REST request to save BookRegistration : {:?}", request);
        precheck(Mutation::Create, &request)?;

        let mut uow = UnitOfWork::begin(&self.repository).await?;
        let id = uow.next_id().await?;
        uow.catalog.put_book_registration(request.to_record(id));
        Self::set_book(&mut uow, id, &request).await?;

        let registration = uow.book_registration(id)?;
        uow.commit().await?;
        tracing::info!("Created BookRegistration {}", id);
        Ok(registration)
    }

    pub async fn replace(&self, path_id: EntityId, request: BookRegistrationRequest) -> AppResult<BookRegistration> {
        tracing::debug!("REST request to update BookRegistration : {}, {:?}", path_id, request);
        let intent = precheck(Mutation::Replace { path_id }, &request)?;

        let mut uow = UnitOfWork::begin(&self.repository).await?;
        ensure_target_exists(&mut uow, EntityKind::BookRegistration, intent).await?;
        uow.catalog.put_book_registration(request.to_record(path_id));
        Self::set_book(&mut uow, path_id, &request).await?;

        let registration = uow.book_registration(path_id)?;
        uow.commit().await?;
        tracing::info!("Replaced BookRegistration {}", path_id);
        Ok(registration)
    }

    pub async fn merge(&self, path_id: EntityId, patch: BookRegistrationPatch) -> AppResult<BookRegistration> {
        tracing::debug!(
            "REST request to partial update BookRegistration partially : {}, {:?}",
            path_id,
            patch
        );
        let intent = precheck(Mutation::Merge { path_id }, &patch)?;

        let mut uow = UnitOfWork::begin(&self.repository).await?;
        ensure_target_exists(&mut uow, EntityKind::BookRegistration, intent).await?;

        if let Some(book) = patch.book.as_set() {
            uow.require(EntityKind::Book, book.id).await?;
            uow.load_owners_of::<BookRegistrations>(path_id).await?;
        }

        merge::merge_book_registration(&mut uow.catalog, path_id, &patch)?;

        let registration = uow.book_registration(path_id)?;
        uow.commit().await?;
        tracing::info!("Merged BookRegistration {}", path_id);
        Ok(registration)
    }

    pub async fn list(&self) -> AppResult<Vec<BookRegistration>> {
        tracing::debug!("REST request to get all BookRegistrations");
        let mut tx = self.repository.begin().await?;
        tx.list_book_registrations().await
    }

    pub async fn get(&self, id: EntityId) -> AppResult<Option<BookRegistration>> {
        tracing::debug!("REST request to get BookRegistration : {}", id);
        let mut tx = self.repository.begin().await?;
        tx.get_book_registration(id).await
    }

    /// Delete a registration and drop it from its book's collection
    pub async fn delete(&self, id: EntityId) -> AppResult<()> {
        tracing::debug!("REST request to delete BookRegistration : {}", id);
        let mut uow = UnitOfWork::begin(&self.repository).await?;
        if !uow.load(EntityKind::BookRegistration, id).await? {
            return Ok(());
        }

        uow.load_owners_of::<BookRegistrations>(id).await?;
        relations::detach_from_other_owners::<BookRegistrations>(&mut uow.catalog, id, None)?;

        uow.delete(EntityKind::BookRegistration, id);
        uow.commit().await?;
        tracing::info!("Deleted BookRegistration {}", id);
        Ok(())
    }

    // Plain reference write: the book's collection is not touched
    async fn set_book(uow: &mut UnitOfWork, id: EntityId, request: &BookRegistrationRequest) -> AppResult<()> {
        let book = request.book.map(|r| r.id);
        if let Some(book) = book {
            uow.require_exists(EntityKind::Book, book).await?;
        }
        relations::set_owner::<BookRegistrations>(&mut uow.catalog, id, book)
    }
}
