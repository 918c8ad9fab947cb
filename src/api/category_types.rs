//! Category type endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::{BaseResponse, CategoryType, CategoryTypePatch, CategoryTypeRequest, EntityId, EntityKind},
    services::mutation::{decode, Mutation},
    AppState,
};

use super::{Alert, JsonBody};

const ENTITY_NAME: &str = EntityKind::CategoryType.entity_name();

/// Create a new category type
#[utoipa::path(
    post,
    path = "/category-types",
    tag = "category-types",
    request_body = CategoryTypeRequest,
    responses(
        (status = 201, description = "Category type created", body = BaseResponse<CategoryType>),
        (status = 400, description = "Category type already has an ID or is invalid", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category_type(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, HeaderMap, Json<BaseResponse<CategoryType>>)> {
    let request: CategoryTypeRequest = decode(Mutation::Create, body)?;
    let category_type = state.services.category_types.create(request).await?;
    let headers = Alert::Created.headers(ENTITY_NAME, category_type.id.unwrap_or_default());
    Ok((StatusCode::CREATED, headers, Json(BaseResponse::created(category_type))))
}

/// Replace an existing category type; its books are replaced too
#[utoipa::path(
    put,
    path = "/category-types/{id}",
    tag = "category-types",
    params(
        ("id" = i64, Path, description = "Category type ID")
    ),
    request_body = CategoryTypeRequest,
    responses(
        (status = 200, description = "Category type updated", body = BaseResponse<CategoryType>),
        (status = 400, description = "Missing, mismatched or unknown ID, or invalid category type", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_category_type(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    JsonBody(body): JsonBody,
) -> AppResult<(HeaderMap, Json<BaseResponse<CategoryType>>)> {
    let request: CategoryTypeRequest = decode(Mutation::Replace { path_id: id }, body)?;
    let category_type = state.services.category_types.replace(id, request).await?;
    Ok((Alert::Updated.headers(ENTITY_NAME, id), Json(BaseResponse::updated(category_type))))
}

/// Partially update a category type; fields absent from the body are left untouched
#[utoipa::path(
    patch,
    path = "/category-types/{id}",
    tag = "category-types",
    params(
        ("id" = i64, Path, description = "Category type ID")
    ),
    request_body(content = CategoryTypePatch, content_type = "application/merge-patch+json"),
    responses(
        (status = 200, description = "Category type patched", body = BaseResponse<CategoryType>),
        (status = 400, description = "Missing, mismatched or unknown ID, or invalid category type", body = crate::error::ErrorResponse)
    )
)]
pub async fn partial_update_category_type(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    JsonBody(body): JsonBody,
) -> AppResult<(HeaderMap, Json<BaseResponse<CategoryType>>)> {
    let patch: CategoryTypePatch = decode(Mutation::Merge { path_id: id }, body)?;
    let category_type = state.services.category_types.merge(id, patch).await?;
    Ok((Alert::Updated.headers(ENTITY_NAME, id), Json(BaseResponse::patched(category_type))))
}

/// List all category types
#[utoipa::path(
    get,
    path = "/category-types",
    tag = "category-types",
    responses(
        (status = 200, description = "All category types", body = BaseResponse<Vec<CategoryType>>)
    )
)]
pub async fn list_category_types(State(state): State<AppState>) -> AppResult<Json<BaseResponse<Vec<CategoryType>>>> {
    let category_types = state.services.category_types.list().await?;
    Ok(Json(BaseResponse::inquiry(Some(category_types))))
}

/// Get a category type by ID; `data` is null when it does not exist
#[utoipa::path(
    get,
    path = "/category-types/{id}",
    tag = "category-types",
    params(
        ("id" = i64, Path, description = "Category type ID")
    ),
    responses(
        (status = 200, description = "The category type, or null data", body = BaseResponse<CategoryType>)
    )
)]
pub async fn get_category_type(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<BaseResponse<CategoryType>>> {
    let category_type = state.services.category_types.get(id).await?;
    Ok(Json(BaseResponse::inquiry(category_type)))
}

/// Delete a category type; its books keep existing without a category
#[utoipa::path(
    delete,
    path = "/category-types/{id}",
    tag = "category-types",
    params(
        ("id" = i64, Path, description = "Category type ID")
    ),
    responses(
        (status = 204, description = "Category type deleted")
    )
)]
pub async fn delete_category_type(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<(StatusCode, HeaderMap)> {
    state.services.category_types.delete(id).await?;
    Ok((StatusCode::NO_CONTENT, Alert::Deleted.headers(ENTITY_NAME, id)))
}
