//! Error types for the book registry server

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Numeric error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 2,
    IdentityConflict = 3,
    MissingIdentity = 4,
    IdentityMismatch = 5,
    NoSuchEntity = 6,
    BadValue = 7,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Create request carried an id
    #[error("A new {entity} cannot already have an ID")]
    IdentityConflict { entity: &'static str },

    /// Replace or merge request body has no id
    #[error("Invalid id")]
    MissingIdentity { entity: &'static str },

    /// Body id differs from the path id
    #[error("Invalid ID: path id {path_id} does not match body id {body_id}")]
    IdentityMismatch {
        entity: &'static str,
        path_id: i64,
        body_id: i64,
    },

    /// Replace or merge target does not exist
    #[error("Entity not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::IdentityConflict { .. } => ErrorCode::IdentityConflict,
            AppError::MissingIdentity { .. } => ErrorCode::MissingIdentity,
            AppError::IdentityMismatch { .. } => ErrorCode::IdentityMismatch,
            AppError::NotFound { .. } => ErrorCode::NoSuchEntity,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }

    /// Alert key reported to clients, e.g. `idexists`
    pub fn error_key(&self) -> &'static str {
        match self {
            AppError::IdentityConflict { .. } => "idexists",
            AppError::MissingIdentity { .. } => "idnull",
            AppError::IdentityMismatch { .. } => "idinvalid",
            AppError::NotFound { .. } => "idnotfound",
            AppError::Validation(_) => "validation",
            AppError::Database(_) | AppError::Internal(_) => "internal",
        }
    }

    pub fn entity_name(&self) -> Option<&'static str> {
        match self {
            AppError::IdentityConflict { entity }
            | AppError::MissingIdentity { entity }
            | AppError::IdentityMismatch { entity, .. }
            | AppError::NotFound { entity, .. } => Some(entity),
            _ => None,
        }
    }

    /// True for rejections the client can correct
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AppError::Database(_) | AppError::Internal(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join(", "))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    pub entity_name: Option<String>,
    pub error_key: String,
}

/// Header carrying the error key, mirrors the alert headers of successful writes
pub const ERROR_HEADER: &str = "x-bookregistry-error";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };

        let code = self.code();
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            "Internal server error".to_string()
        };
        let error_key = self.error_key();
        let entity_name = self.entity_name();

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            entity_name: entity_name.map(str::to_string),
            error_key: error_key.to_string(),
        });

        let mut response = (status, body).into_response();
        if let Ok(value) = HeaderValue::from_str(&format!("error.{}", error_key)) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(ERROR_HEADER), value);
        }
        response
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_client_errors_are_bad_request() {
        let errors = [
            AppError::IdentityConflict { entity: "bookBook" },
            AppError::MissingIdentity { entity: "bookBook" },
            AppError::IdentityMismatch { entity: "bookBook", path_id: 1, body_id: 2 },
            AppError::NotFound { entity: "bookBook", id: 1 },
            AppError::Validation("title: required".into()),
        ];
        for error in errors {
            assert!(error.is_client_error());
            assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_internal_error_is_hidden() {
        let response = AppError::Internal("lock poisoned".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_keys() {
        assert_eq!(AppError::IdentityConflict { entity: "x" }.error_key(), "idexists");
        assert_eq!(AppError::MissingIdentity { entity: "x" }.error_key(), "idnull");
        assert_eq!(
            AppError::IdentityMismatch { entity: "x", path_id: 1, body_id: 2 }.error_key(),
            "idinvalid"
        );
        assert_eq!(AppError::NotFound { entity: "x", id: 1 }.error_key(), "idnotfound");
    }

    #[test]
    fn test_validation_errors_conversion() {
        let mut errors = ValidationErrors::new();
        let mut error = ValidationError::new("length");
        error.message = Some("must be at most 500 characters".into());
        errors.add("description", error);
        errors.add("title", ValidationError::new("required"));

        match AppError::from(errors) {
            AppError::Validation(msg) => {
                assert_eq!(
                    msg,
                    "description: must be at most 500 characters, title: required"
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
