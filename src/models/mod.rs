//! Data models for the book registry

pub mod book;
pub mod book_registration;
pub mod catalog;
pub mod category_type;
pub mod enums;
pub mod envelope;
pub mod patch;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Re-export commonly used types
pub use book::{Book, BookPatch, BookRequest};
pub use book_registration::{BookRegistration, BookRegistrationPatch, BookRegistrationRequest};
pub use catalog::Catalog;
pub use category_type::{CategoryType, CategoryTypePatch, CategoryTypeRequest};
pub use enums::BookStatus;
pub use envelope::BaseResponse;
pub use patch::Patch;

/// Store-issued record identifier
pub type EntityId = i64;

/// Maximum length of free-text fields (`description`, `remarks`)
pub const MAX_TEXT_LENGTH: u64 = 500;

/// Reference to another record, serialised as `{"id": n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    #[schema(value_type = i64)]
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(id: EntityId) -> Self {
        Self { id }
    }
}

impl From<EntityId> for EntityRef {
    fn from(id: EntityId) -> Self {
        Self { id }
    }
}

/// The three record kinds held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Book,
    CategoryType,
    BookRegistration,
}

impl EntityKind {
    /// Entity name used in alerts and error bodies
    pub const fn entity_name(self) -> &'static str {
        match self {
            EntityKind::Book => "bookBook",
            EntityKind::CategoryType => "bookCategoryType",
            EntityKind::BookRegistration => "bookBookRegistration",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Book => "book",
            EntityKind::CategoryType => "category_type",
            EntityKind::BookRegistration => "book_registration",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntityKind::Book => "Book",
            EntityKind::CategoryType => "CategoryType",
            EntityKind::BookRegistration => "BookRegistration",
        };
        write!(f, "{}", label)
    }
}

/// Anything carrying an optional store identifier
pub trait Identified {
    const KIND: EntityKind;

    fn id(&self) -> Option<EntityId>;
}

/// Identity-based equality: equal iff both ids are set and match.
/// A record without an id is never equal to anything, itself included.
macro_rules! identity_eq {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    match (self.id, other.id) {
                        (Some(a), Some(b)) => a == b,
                        _ => false,
                    }
                }
            }
        )+
    };
}

identity_eq!(Book, CategoryType, BookRegistration);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let mut first = Book::new("author1", "title1");
        first.id = Some(1);
        let mut second = Book::new("author2", "title2");
        assert_ne!(first, second);

        second.id = first.id;
        assert_eq!(first, second);

        second.id = Some(2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_unsaved_records_never_equal() {
        let unsaved = CategoryType::new("Fiction");
        assert_ne!(unsaved, unsaved.clone());

        let registration = BookRegistration::default();
        assert!(registration != registration.clone());
    }

    #[test]
    fn test_entity_ref_wire_shape() {
        let json = serde_json::to_value(EntityRef::new(5)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 5 }));
    }
}
