//! Book registration endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::{BaseResponse, BookRegistration, BookRegistrationPatch, BookRegistrationRequest, EntityId, EntityKind},
    services::mutation::{decode, Mutation},
    AppState,
};

use super::{Alert, JsonBody};

const ENTITY_NAME: &str = EntityKind::BookRegistration.entity_name();

/// Register a loan request for a book
#[utoipa::path(
    post,
    path = "/book-registrations",
    tag = "book-registrations",
    request_body = BookRegistrationRequest,
    responses(
        (status = 201, description = "Book registration created", body = BaseResponse<BookRegistration>),
        (status = 400, description = "Book registration already has an ID or is invalid", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book_registration(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, HeaderMap, Json<BaseResponse<BookRegistration>>)> {
    let request: BookRegistrationRequest = decode(Mutation::Create, body)?;
    let registration = state.services.book_registrations.create(request).await?;
    let headers = Alert::Created.headers(ENTITY_NAME, registration.id.unwrap_or_default());
    Ok((StatusCode::CREATED, headers, Json(BaseResponse::created(registration))))
}

/// Replace an existing book registration
#[utoipa::path(
    put,
    path = "/book-registrations/{id}",
    tag = "book-registrations",
    params(
        ("id" = i64, Path, description = "Book registration ID")
    ),
    request_body = BookRegistrationRequest,
    responses(
        (status = 200, description = "Book registration updated", body = BaseResponse<BookRegistration>),
        (status = 400, description = "Missing, mismatched or unknown ID, or invalid book registration", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_registration(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    JsonBody(body): JsonBody,
) -> AppResult<(HeaderMap, Json<BaseResponse<BookRegistration>>)> {
    let request: BookRegistrationRequest = decode(Mutation::Replace { path_id: id }, body)?;
    let registration = state.services.book_registrations.replace(id, request).await?;
    Ok((Alert::Updated.headers(ENTITY_NAME, id), Json(BaseResponse::updated(registration))))
}

/// Partially update a book registration; fields absent from the body are left untouched
#[utoipa::path(
    patch,
    path = "/book-registrations/{id}",
    tag = "book-registrations",
    params(
        ("id" = i64, Path, description = "Book registration ID")
    ),
    request_body(content = BookRegistrationPatch, content_type = "application/merge-patch+json"),
    responses(
        (status = 200, description = "Book registration patched", body = BaseResponse<BookRegistration>),
        (status = 400, description = "Missing, mismatched or unknown ID, or invalid book registration", body = crate::error::ErrorResponse)
    )
)]
pub async fn partial_update_book_registration(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    JsonBody(body): JsonBody,
) -> AppResult<(HeaderMap, Json<BaseResponse<BookRegistration>>)> {
    let patch: BookRegistrationPatch = decode(Mutation::Merge { path_id: id }, body)?;
    let registration = state.services.book_registrations.merge(id, patch).await?;
    Ok((Alert::Updated.headers(ENTITY_NAME, id), Json(BaseResponse::patched(registration))))
}

/// List all book registrations
#[utoipa::path(
    get,
    path = "/book-registrations",
    tag = "book-registrations",
    responses(
        (status = 200, description = "All book registrations", body = BaseResponse<Vec<BookRegistration>>)
    )
)]
pub async fn list_book_registrations(State(state): State<AppState>) -> AppResult<Json<BaseResponse<Vec<BookRegistration>>>> {
    let registrations = state.services.book_registrations.list().await?;
    Ok(Json(BaseResponse::inquiry(Some(registrations))))
}

/// Get a book registration by ID; `data` is null when it does not exist
#[utoipa::path(
    get,
    path = "/book-registrations/{id}",
    tag = "book-registrations",
    params(
        ("id" = i64, Path, description = "Book registration ID")
    ),
    responses(
        (status = 200, description = "The book registration, or null data", body = BaseResponse<BookRegistration>)
    )
)]
pub async fn get_book_registration(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<BaseResponse<BookRegistration>>> {
    let registration = state.services.book_registrations.get(id).await?;
    Ok(Json(BaseResponse::inquiry(registration)))
}

/// Delete a book registration; deleting a missing one succeeds
#[utoipa::path(
    delete,
    path = "/book-registrations/{id}",
    tag = "book-registrations",
    params(
        ("id" = i64, Path, description = "Book registration ID")
    ),
    responses(
        (status = 204, description = "Book registration deleted")
    )
)]
pub async fn delete_book_registration(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<(StatusCode, HeaderMap)> {
    state.services.book_registrations.delete(id).await?;
    Ok((StatusCode::NO_CONTENT, Alert::Deleted.headers(ENTITY_NAME, id)))
}
