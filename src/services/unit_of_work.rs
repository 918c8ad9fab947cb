//! Working set of a single write request

use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookRegistration, Catalog, CategoryType, EntityId, EntityKind, EntityRef},
    repository::{Repository, StoreTx},
    services::relations::OneToMany,
};

/// One store transaction plus the records a request has read into memory.
///
/// Services load what they need into `catalog`, edit it through the
/// relationship manager and merge engine, then [`commit`](Self::commit)
/// writes every loaded record back. Dropping it without committing discards
/// everything.
pub struct UnitOfWork {
    tx: Box<dyn StoreTx>,
    pub catalog: Catalog,
    deleted: Vec<(EntityKind, EntityId)>,
}

impl UnitOfWork {
    pub async fn begin(repository: &Repository) -> AppResult<Self> {
        Ok(Self {
            tx: repository.begin().await?,
            catalog: Catalog::new(),
            deleted: Vec::new(),
        })
    }

    /// Read a record into the working set; `false` when the store has none.
    /// Records already loaded are not read again.
    pub async fn load(&mut self, kind: EntityKind, id: EntityId) -> AppResult<bool> {
        if self.catalog.contains(kind, id) {
            return Ok(true);
        }

        match kind {
            EntityKind::Book => match self.tx.get_book(id).await? {
                Some(book) => self.catalog.put_book(book),
                None => return Ok(false),
            },
            EntityKind::CategoryType => match self.tx.get_category_type(id).await? {
                Some(category_type) => self.catalog.put_category_type(category_type),
                None => return Ok(false),
            },
            EntityKind::BookRegistration => match self.tx.get_book_registration(id).await? {
                Some(registration) => self.catalog.put_book_registration(registration),
                None => return Ok(false),
            },
        }
        Ok(true)
    }

    /// Load a referenced record, rejecting the request when it does not exist
    pub async fn require(&mut self, kind: EntityKind, id: EntityId) -> AppResult<()> {
        if self.load(kind, id).await? {
            Ok(())
        } else {
            Err(missing_reference(kind, id))
        }
    }

    /// Load every child listed in the owner's collection; dangling ids are skipped
    pub async fn load_children<R: OneToMany>(&mut self, owner: EntityId) -> AppResult<()> {
        let children: Vec<EntityId> = R::children(&self.catalog, owner)
            .map(|set| set.iter().map(|r| r.id).collect())
            .unwrap_or_default();
        for child in children {
            self.load(R::CHILD, child).await?;
        }
        Ok(())
    }

    /// Load the owner named by the child's back-reference, if it still exists,
    /// and every owner whose collection lists the child
    pub async fn load_owners_of<R: OneToMany>(&mut self, child: EntityId) -> AppResult<()> {
        if let Some(Some(owner)) = R::back_ref(&self.catalog, child) {
            self.load(R::OWNER, owner.id).await?;
        }
        for owner in self.tx.owners_listing(R::CHILD, child).await? {
            self.load(R::OWNER, owner).await?;
        }
        Ok(())
    }

    /// Reject the request unless the record exists. Unlike [`require`](Self::require)
    /// the record is not read into the working set.
    pub async fn require_exists(&mut self, kind: EntityKind, id: EntityId) -> AppResult<()> {
        if self.catalog.contains(kind, id) || self.tx.exists(kind, id).await? {
            Ok(())
        } else {
            Err(missing_reference(kind, id))
        }
    }

    /// Require every incoming child and load the owner it currently belongs to
    pub async fn prepare_adoption<R: OneToMany>(&mut self, children: &BTreeSet<EntityRef>) -> AppResult<()> {
        for child in children {
            self.require(R::CHILD, child.id).await?;
            self.load_owners_of::<R>(child.id).await?;
        }
        Ok(())
    }

    pub async fn next_id(&mut self) -> AppResult<EntityId> {
        self.tx.next_id().await
    }

    /// Drop a record from the working set and delete it on commit
    pub fn delete(&mut self, kind: EntityKind, id: EntityId) {
        self.catalog.remove(kind, id);
        self.deleted.push((kind, id));
    }

    pub fn book(&self, id: EntityId) -> AppResult<Book> {
        self.catalog
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| not_loaded(EntityKind::Book, id))
    }

    pub fn category_type(&self, id: EntityId) -> AppResult<CategoryType> {
        self.catalog
            .category_types
            .get(&id)
            .cloned()
            .ok_or_else(|| not_loaded(EntityKind::CategoryType, id))
    }

    pub fn book_registration(&self, id: EntityId) -> AppResult<BookRegistration> {
        self.catalog
            .book_registrations
            .get(&id)
            .cloned()
            .ok_or_else(|| not_loaded(EntityKind::BookRegistration, id))
    }

    /// Write every record of the working set, apply deletions, commit
    pub async fn commit(self) -> AppResult<()> {
        let UnitOfWork {
            mut tx,
            catalog,
            deleted,
        } = self;

        for book in catalog.books.values() {
            tx.upsert_book(book).await?;
        }
        for category_type in catalog.category_types.values() {
            tx.upsert_category_type(category_type).await?;
        }
        for registration in catalog.book_registrations.values() {
            tx.upsert_book_registration(registration).await?;
        }
        for (kind, id) in deleted {
            tx.delete(kind, id).await?;
        }

        tracing::debug!("Committed {} record(s)", catalog.len());
        tx.commit().await
    }
}

fn missing_reference(kind: EntityKind, id: EntityId) -> AppError {
    AppError::Validation(format!("{} {} does not exist", kind, id))
}

fn not_loaded(kind: EntityKind, id: EntityId) -> AppError {
    AppError::Internal(format!("{} {} is not in the working set", kind, id))
}
