//! Arena of records addressed by id

use std::collections::BTreeMap;

use super::{Book, BookRegistration, CategoryType, EntityId, EntityKind};

/// Records of all three kinds keyed by id.
///
/// Used both as the whole state of the in-memory store and as the working
/// set of a single request (only the records that request touches).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub books: BTreeMap<EntityId, Book>,
    pub category_types: BTreeMap<EntityId, CategoryType>,
    pub book_registrations: BTreeMap<EntityId, BookRegistration>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Book => self.books.contains_key(&id),
            EntityKind::CategoryType => self.category_types.contains_key(&id),
            EntityKind::BookRegistration => self.book_registrations.contains_key(&id),
        }
    }

    pub fn remove(&mut self, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Book => self.books.remove(&id).is_some(),
            EntityKind::CategoryType => self.category_types.remove(&id).is_some(),
            EntityKind::BookRegistration => self.book_registrations.remove(&id).is_some(),
        }
    }

    /// Insert a book; records without an id are ignored
    pub fn put_book(&mut self, book: Book) {
        if let Some(id) = book.id {
            self.books.insert(id, book);
        }
    }

    pub fn put_category_type(&mut self, category_type: CategoryType) {
        if let Some(id) = category_type.id {
            self.category_types.insert(id, category_type);
        }
    }

    pub fn put_book_registration(&mut self, registration: BookRegistration) {
        if let Some(id) = registration.id {
            self.book_registrations.insert(id, registration);
        }
    }

    pub fn len(&self) -> usize {
        self.books.len() + self.category_types.len() + self.book_registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
