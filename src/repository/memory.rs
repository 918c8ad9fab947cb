//! In-memory entity store

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{EntityStore, StoreTx};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookRegistration, Catalog, CategoryType, EntityId, EntityKind, EntityRef},
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    catalog: Catalog,
    last_id: EntityId,
}

/// Store keeping the whole catalog in one arena.
///
/// A transaction holds the lock for its whole life and edits a copy of the
/// arena. Commit swaps the copy in.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.catalog.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: Catalog,
}

fn require_id(kind: EntityKind, id: Option<EntityId>) -> AppResult<EntityId> {
    id.ok_or_else(|| AppError::Internal(format!("cannot store {} without an id", kind)))
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn get_book(&mut self, id: EntityId) -> AppResult<Option<Book>> {
        Ok(self.working.books.get(&id).cloned())
    }

    async fn get_category_type(&mut self, id: EntityId) -> AppResult<Option<CategoryType>> {
        Ok(self.working.category_types.get(&id).cloned())
    }

    async fn get_book_registration(&mut self, id: EntityId) -> AppResult<Option<BookRegistration>> {
        Ok(self.working.book_registrations.get(&id).cloned())
    }

    async fn list_books(&mut self) -> AppResult<Vec<Book>> {
        Ok(self.working.books.values().cloned().collect())
    }

    async fn list_category_types(&mut self) -> AppResult<Vec<CategoryType>> {
        Ok(self.working.category_types.values().cloned().collect())
    }

    async fn list_book_registrations(&mut self) -> AppResult<Vec<BookRegistration>> {
        Ok(self.working.book_registrations.values().cloned().collect())
    }

    async fn exists(&mut self, kind: EntityKind, id: EntityId) -> AppResult<bool> {
        Ok(self.working.contains(kind, id))
    }

    async fn owners_listing(&mut self, child_kind: EntityKind, child: EntityId) -> AppResult<Vec<EntityId>> {
        let child = EntityRef::new(child);
        let owners = match child_kind {
            EntityKind::Book => self
                .working
                .category_types
                .iter()
                .filter(|(_, category_type)| category_type.books.contains(&child))
                .map(|(id, _)| *id)
                .collect(),
            EntityKind::BookRegistration => self
                .working
                .books
                .iter()
                .filter(|(_, book)| book.book_registrations.contains(&child))
                .map(|(id, _)| *id)
                .collect(),
            EntityKind::CategoryType => Vec::new(),
        };
        Ok(owners)
    }

    // Ids taken by a rolled-back transaction stay consumed.
    async fn next_id(&mut self) -> AppResult<EntityId> {
        self.guard.last_id += 1;
        Ok(self.guard.last_id)
    }

    async fn upsert_book(&mut self, book: &Book) -> AppResult<()> {
        require_id(EntityKind::Book, book.id)?;
        self.working.put_book(book.clone());
        Ok(())
    }

    async fn upsert_category_type(&mut self, category_type: &CategoryType) -> AppResult<()> {
        require_id(EntityKind::CategoryType, category_type.id)?;
        self.working.put_category_type(category_type.clone());
        Ok(())
    }

    async fn upsert_book_registration(&mut self, registration: &BookRegistration) -> AppResult<()> {
        require_id(EntityKind::BookRegistration, registration.id)?;
        self.working.put_book_registration(registration.clone());
        Ok(())
    }

    async fn delete(&mut self, kind: EntityKind, id: EntityId) -> AppResult<()> {
        self.working.remove(kind, id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTx { mut guard, working } = *self;
        guard.catalog = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        let id = tx.next_id().await.unwrap();
        tx.upsert_book(&Book::new("A", "T").with_id(id)).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let book = tx.get_book(id).await.unwrap().unwrap();
        assert_eq!(book.author, "A");
        assert!(tx.exists(EntityKind::Book, id).await.unwrap());
        assert!(!tx.exists(EntityKind::CategoryType, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.upsert_category_type(&CategoryType::new("Fiction").with_id(1))
                .await
                .unwrap();
        }

        let mut tx = store.begin().await.unwrap();
        assert!(tx.list_category_types().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_across_kinds() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let first = tx.next_id().await.unwrap();
        let second = tx.next_id().await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let third = tx.next_id().await.unwrap();
        drop(tx);

        let mut tx = store.begin().await.unwrap();
        let fourth = tx.next_id().await.unwrap();
        assert!(first < second && second < third && third < fourth);
    }

    #[tokio::test]
    async fn test_owners_listing_ignores_back_references() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let mut category_type = CategoryType::new("Fiction").with_id(1);
        category_type.books.insert(EntityRef::new(3));
        tx.upsert_category_type(&category_type).await.unwrap();
        tx.upsert_category_type(&CategoryType::new("Poetry").with_id(2)).await.unwrap();
        // Back-reference points elsewhere; only the collection counts
        let mut book = Book::new("A", "T").with_id(3);
        book.category_type = Some(EntityRef::new(2));
        tx.upsert_book(&book).await.unwrap();

        assert_eq!(tx.owners_listing(EntityKind::Book, 3).await.unwrap(), vec![1]);
        assert!(tx.owners_listing(EntityKind::BookRegistration, 3).await.unwrap().is_empty());
        assert!(tx.owners_listing(EntityKind::CategoryType, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.delete(EntityKind::BookRegistration, 77).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[test]
    fn test_upsert_without_id_is_rejected() {
        let store = MemoryStore::new();
        tokio_test::block_on(async {
            let mut tx = store.begin().await.unwrap();
            let result = tx.upsert_book(&Book::new("A", "T")).await;
            assert!(matches!(result, Err(AppError::Internal(_))));
        });
    }
}
