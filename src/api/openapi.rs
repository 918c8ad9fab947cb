//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{book_registrations, books, category_types, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Book Registry API",
        version = "1.0.0",
        description = "Book catalog and loan registration REST API"
    ),
    servers(
        (url = "/api", description = "REST API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::create_book,
        books::update_book,
        books::partial_update_book,
        books::list_books,
        books::get_book,
        books::delete_book,
        // Category types
        category_types::create_category_type,
        category_types::update_category_type,
        category_types::partial_update_category_type,
        category_types::list_category_types,
        category_types::get_category_type,
        category_types::delete_category_type,
        // Book registrations
        book_registrations::create_book_registration,
        book_registrations::update_book_registration,
        book_registrations::partial_update_book_registration,
        book_registrations::list_book_registrations,
        book_registrations::get_book_registration,
        book_registrations::delete_book_registration,
    ),
    components(
        schemas(
            crate::models::EntityRef,
            crate::models::BookStatus,
            // Books
            crate::models::Book,
            crate::models::BookRequest,
            crate::models::BookPatch,
            // Category types
            crate::models::CategoryType,
            crate::models::CategoryTypeRequest,
            crate::models::CategoryTypePatch,
            // Book registrations
            crate::models::BookRegistration,
            crate::models::BookRegistrationRequest,
            crate::models::BookRegistrationPatch,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "category-types", description = "Book categories"),
        (name = "book-registrations", description = "Loan registrations")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
