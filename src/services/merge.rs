//! Merge engine: apply-if-present updates over the working set
//!
//! Scalars are written only when the patch carries a value. A reference that
//! changes is re-linked through the relationship manager, and a collection
//! that is present replaces the owner's children. Fields are independent of
//! each other, so the outcome does not depend on the order they are applied.

use crate::{
    error::{AppError, AppResult},
    models::{BookPatch, BookRegistrationPatch, Catalog, CategoryTypePatch, EntityId, EntityKind, EntityRef},
    services::relations::{self, BookRegistrations, CategoryBooks},
};

pub fn merge_book(catalog: &mut Catalog, id: EntityId, patch: &BookPatch) -> AppResult<()> {
    let book = catalog
        .books
        .get_mut(&id)
        .ok_or_else(|| not_loaded(EntityKind::Book, id))?;

    patch.author.apply_to(&mut book.author);
    patch.title.apply_to(&mut book.title);
    patch.description.apply_to_option(&mut book.description);
    let current_category = book.category_type;

    if let Some(category) = patch.category_type.as_set() {
        if current_category != Some(*category) {
            relations::relink::<CategoryBooks>(catalog, id, category.id)?;
        }
    }
    if let Some(registrations) = patch.book_registrations.as_set() {
        let children = registrations.iter().copied().collect();
        relations::adopt_children::<BookRegistrations>(catalog, id, children)?;
    }
    Ok(())
}

pub fn merge_category_type(catalog: &mut Catalog, id: EntityId, patch: &CategoryTypePatch) -> AppResult<()> {
    let category_type = catalog
        .category_types
        .get_mut(&id)
        .ok_or_else(|| not_loaded(EntityKind::CategoryType, id))?;

    patch.title.apply_to(&mut category_type.title);
    patch.description.apply_to_option(&mut category_type.description);

    if let Some(books) = patch.books.as_set() {
        let children = books.iter().copied().collect();
        relations::adopt_children::<CategoryBooks>(catalog, id, children)?;
    }
    Ok(())
}

pub fn merge_book_registration(
    catalog: &mut Catalog,
    id: EntityId,
    patch: &BookRegistrationPatch,
) -> AppResult<()> {
    let registration = catalog
        .book_registrations
        .get_mut(&id)
        .ok_or_else(|| not_loaded(EntityKind::BookRegistration, id))?;

    patch.student_id.apply_to_option(&mut registration.student_id);
    patch.request_date.apply_to_option(&mut registration.request_date);
    patch.request_status.apply_to_option(&mut registration.request_status);
    patch.return_date.apply_to_option(&mut registration.return_date);
    patch.remarks.apply_to_option(&mut registration.remarks);
    let current_book: Option<EntityRef> = registration.book;

    if let Some(book) = patch.book.as_set() {
        if current_book != Some(*book) {
            relations::relink::<BookRegistrations>(catalog, id, book.id)?;
        }
    }
    Ok(())
}

fn not_loaded(kind: EntityKind, id: EntityId) -> AppError {
    AppError::Internal(format!("{} {} must be loaded before merging", kind, id))
}
