//! Book endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::{BaseResponse, Book, BookPatch, BookRequest, EntityId, EntityKind},
    services::mutation::{decode, Mutation},
    AppState,
};

use super::{Alert, JsonBody};

const ENTITY_NAME: &str = EntityKind::Book.entity_name();

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = BaseResponse<Book>),
        (status = 400, description = "Book already has an ID or is invalid", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, HeaderMap, Json<BaseResponse<Book>>)> {
    let request: BookRequest = decode(Mutation::Create, body)?;
    let book = state.services.books.create(request).await?;
    let headers = Alert::Created.headers(ENTITY_NAME, book.id.unwrap_or_default());
    Ok((StatusCode::CREATED, headers, Json(BaseResponse::created(book))))
}

/// Replace an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = BaseResponse<Book>),
        (status = 400, description = "Missing, mismatched or unknown ID, or invalid book", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    JsonBody(body): JsonBody,
) -> AppResult<(HeaderMap, Json<BaseResponse<Book>>)> {
    let request: BookRequest = decode(Mutation::Replace { path_id: id }, body)?;
    let book = state.services.books.replace(id, request).await?;
    Ok((Alert::Updated.headers(ENTITY_NAME, id), Json(BaseResponse::updated(book))))
}

/// Partially update a book; fields absent from the body are left untouched
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body(content = BookPatch, content_type = "application/merge-patch+json"),
    responses(
        (status = 200, description = "Book patched", body = BaseResponse<Book>),
        (status = 400, description = "Missing, mismatched or unknown ID, or invalid book", body = crate::error::ErrorResponse)
    )
)]
pub async fn partial_update_book(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    JsonBody(body): JsonBody,
) -> AppResult<(HeaderMap, Json<BaseResponse<Book>>)> {
    let patch: BookPatch = decode(Mutation::Merge { path_id: id }, body)?;
    let book = state.services.books.merge(id, patch).await?;
    Ok((Alert::Updated.headers(ENTITY_NAME, id), Json(BaseResponse::patched(book))))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = BaseResponse<Vec<Book>>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<BaseResponse<Vec<Book>>>> {
    let books = state.services.books.list().await?;
    Ok(Json(BaseResponse::inquiry(Some(books))))
}

/// Get a book by ID; `data` is null when it does not exist
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "The book, or null data", body = BaseResponse<Book>)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<BaseResponse<Book>>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(BaseResponse::inquiry(book)))
}

/// Delete a book; deleting a missing book succeeds
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<(StatusCode, HeaderMap)> {
    state.services.books.delete(id).await?;
    Ok((StatusCode::NO_CONTENT, Alert::Deleted.headers(ENTITY_NAME, id)))
}
