//! API handlers for the book registry REST endpoints

pub mod book_registrations;
pub mod books;
pub mod category_types;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{HeaderMap, HeaderName, HeaderValue},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::EntityId, AppState};

pub const ALERT_HEADER: &str = "x-bookregistry-alert";
pub const PARAMS_HEADER: &str = "x-bookregistry-params";

/// Outcome of a successful write, reported through the alert headers
#[derive(Debug, Clone, Copy)]
pub enum Alert {
    Created,
    Updated,
    Deleted,
}

impl Alert {
    pub fn message(self, entity: &str, id: EntityId) -> String {
        match self {
            Alert::Created => format!("A new {} is created with identifier {}", entity, id),
            Alert::Updated => format!("A {} is updated with identifier {}", entity, id),
            Alert::Deleted => format!("A {} is deleted with identifier {}", entity, id),
        }
    }

    pub fn headers(self, entity: &str, id: EntityId) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.message(entity, id)) {
            headers.insert(HeaderName::from_static(ALERT_HEADER), value);
        }
        headers.insert(HeaderName::from_static(PARAMS_HEADER), HeaderValue::from(id));
        headers
    }
}

/// Raw JSON request body, decoded into a typed request by the handler once
/// the identity checks have run. Malformed JSON or a non-JSON content type is
/// rejected as a validation error with the usual error body.
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// Build the application router with every route and layer
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .patch(books::partial_update_book)
                .delete(books::delete_book),
        )
        // Category types
        .route(
            "/category-types",
            get(category_types::list_category_types).post(category_types::create_category_type),
        )
        .route(
            "/category-types/:id",
            get(category_types::get_category_type)
                .put(category_types::update_category_type)
                .patch(category_types::partial_update_category_type)
                .delete(category_types::delete_category_type),
        )
        // Book registrations
        .route(
            "/book-registrations",
            get(book_registrations::list_book_registrations)
                .post(book_registrations::create_book_registration),
        )
        .route(
            "/book-registrations/:id",
            get(book_registrations::get_book_registration)
                .put(book_registrations::update_book_registration)
                .patch(book_registrations::partial_update_book_registration)
                .delete(book_registrations::delete_book_registration),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
