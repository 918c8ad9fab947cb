//! Category type service

use crate::{
    error::AppResult,
    models::{CategoryType, CategoryTypePatch, CategoryTypeRequest, EntityId, EntityKind},
    repository::Repository,
    services::{
        merge,
        mutation::{ensure_target_exists, precheck, Mutation},
        relations::{self, CategoryBooks},
        unit_of_work::UnitOfWork,
    },
};

#[derive(Clone)]
pub struct CategoryTypesService {
    repository: Repository,
}

impl CategoryTypesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CategoryTypeRequest) -> AppResult<CategoryType> {
        tracing::debug!("REST request to save CategoryType : {:?}", request);
        precheck(Mutation::Create, &request)?;

        let mut uow = UnitOfWork::begin(&self.repository).await?;
        let id = uow.next_id().await?;
        uow.catalog.put_category_type(request.to_record(id));

        let books = request.book_refs();
        uow.prepare_adoption::<CategoryBooks>(&books).await?;
        relations::adopt_children::<CategoryBooks>(&mut uow.catalog, id, books)?;

        let category_type = uow.category_type(id)?;
        uow.commit().await?;
        tracing::info!("Created CategoryType {}", id);
        Ok(category_type)
    }

    pub async fn replace(&self, path_id: EntityId, request: CategoryTypeRequest) -> AppResult<CategoryType> {
        tracing::debug!("REST request to update CategoryType : {}, {:?}", path_id, request);
        let intent = precheck(Mutation::Replace { path_id }, &request)?;

        let mut uow = UnitOfWork::begin(&self.repository).await?;
        ensure_target_exists(&mut uow, EntityKind::CategoryType, intent).await?;
        uow.load_children::<CategoryBooks>(path_id).await?;

        let previous = uow.category_type(path_id)?;
        let mut record = request.to_record(path_id);
        record.books = previous.books;
        uow.catalog.put_category_type(record);

        let books = request.book_refs();
        uow.prepare_adoption::<CategoryBooks>(&books).await?;
        relations::adopt_children::<CategoryBooks>(&mut uow.catalog, path_id, books)?;

        let category_type = uow.category_type(path_id)?;
        uow.commit().await?;
        tracing::info!("Replaced CategoryType {}", path_id);
        Ok(category_type)
    }

    pub async fn merge(&self, path_id: EntityId, patch: CategoryTypePatch) -> AppResult<CategoryType> {
        tracing::debug!(
            "REST request to partial update CategoryType partially : {}, {:?}",
            path_id,
            patch
        );
        let intent = precheck(Mutation::Merge { path_id }, &patch)?;

        let mut uow = UnitOfWork::begin(&self.repository).await?;
        ensure_target_exists(&mut uow, EntityKind::CategoryType, intent).await?;

        if let Some(books) = patch.books.as_set() {
            uow.load_children::<CategoryBooks>(path_id).await?;
            let children = books.iter().copied().collect();
            uow.prepare_adoption::<CategoryBooks>(&children).await?;
        }

        merge::merge_category_type(&mut uow.catalog, path_id, &patch)?;

        let category_type = uow.category_type(path_id)?;
        uow.commit().await?;
        tracing::info!("Merged CategoryType {}", path_id);
        Ok(category_type)
    }

    pub async fn list(&self) -> AppResult<Vec<CategoryType>> {
        tracing::debug!("REST request to get all CategoryTypes");
        let mut tx = self.repository.begin().await?;
        tx.list_category_types().await
    }

    pub async fn get(&self, id: EntityId) -> AppResult<Option<CategoryType>> {
        tracing::debug!("REST request to get CategoryType : {}", id);
        let mut tx = self.repository.begin().await?;
        tx.get_category_type(id).await
    }

    /// Delete a category type; the books it lists lose their category
    pub async fn delete(&self, id: EntityId) -> AppResult<()> {
        tracing::debug!("REST request to delete CategoryType : {}", id);
        let mut uow = UnitOfWork::begin(&self.repository).await?;
        if !uow.load(EntityKind::CategoryType, id).await? {
            return Ok(());
        }

        uow.load_children::<CategoryBooks>(id).await?;
        relations::set_children::<CategoryBooks>(&mut uow.catalog, id, Default::default())?;

        uow.delete(EntityKind::CategoryType, id);
        uow.commit().await?;
        tracing::info!("Deleted CategoryType {}", id);
        Ok(())
    }
}
