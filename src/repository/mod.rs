//! Repository layer: the entity store behind every service

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Book, BookRegistration, CategoryType, EntityId, EntityKind},
};

/// Key-value persistence for the three record kinds
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Open a transaction. Writes become visible on [`StoreTx::commit`];
    /// dropping the transaction discards them.
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>>;
}

/// One atomic unit of store work
#[async_trait]
pub trait StoreTx: Send {
    async fn get_book(&mut self, id: EntityId) -> AppResult<Option<Book>>;
    async fn get_category_type(&mut self, id: EntityId) -> AppResult<Option<CategoryType>>;
    async fn get_book_registration(&mut self, id: EntityId) -> AppResult<Option<BookRegistration>>;

    async fn list_books(&mut self) -> AppResult<Vec<Book>>;
    async fn list_category_types(&mut self) -> AppResult<Vec<CategoryType>>;
    async fn list_book_registrations(&mut self) -> AppResult<Vec<BookRegistration>>;

    async fn exists(&mut self, kind: EntityKind, id: EntityId) -> AppResult<bool>;

    /// Ids of the records whose collection lists `child`, whatever the
    /// child's own back-reference says. Category types list books, books
    /// list registrations; category types are listed by nobody.
    async fn owners_listing(&mut self, child_kind: EntityKind, child: EntityId) -> AppResult<Vec<EntityId>>;

    /// Issue a fresh id; ids are never reused, even after a rollback
    async fn next_id(&mut self) -> AppResult<EntityId>;

    /// Insert or overwrite; the record must carry an id
    async fn upsert_book(&mut self, book: &Book) -> AppResult<()>;
    async fn upsert_category_type(&mut self, category_type: &CategoryType) -> AppResult<()>;
    async fn upsert_book_registration(&mut self, registration: &BookRegistration) -> AppResult<()>;

    /// Delete by id; absence is not an error
    async fn delete(&mut self, kind: EntityKind, id: EntityId) -> AppResult<()>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Handle to the configured store, cloned into every service
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn EntityStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Repository backed by the in-memory arena
    pub fn memory() -> Self {
        Self::new(Arc::new(memory::MemoryStore::new()))
    }

    /// Repository backed by PostgreSQL
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::new(Arc::new(postgres::PgStore::new(pool)))
    }

    pub async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        self.store.begin().await
    }
}
