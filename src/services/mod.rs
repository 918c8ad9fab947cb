//! Business logic services

pub mod book_registrations;
pub mod books;
pub mod category_types;
pub mod merge;
pub mod mutation;
pub mod relations;
pub mod unit_of_work;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub category_types: category_types::CategoryTypesService,
    pub book_registrations: book_registrations::BookRegistrationsService,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            category_types: category_types::CategoryTypesService::new(repository.clone()),
            book_registrations: book_registrations::BookRegistrationsService::new(repository),
        }
    }
}
