//! Book registration (loan record) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::enums::BookStatus;
use super::patch::{check_max_length, into_result, Patch};
use super::{EntityId, EntityKind, EntityRef, Identified, MAX_TEXT_LENGTH};

/// Registration of a student borrowing a book
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRegistration {
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    pub student_id: Option<String>,
    pub request_date: Option<DateTime<Utc>>,
    pub request_status: Option<BookStatus>,
    pub return_date: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    /// Owning book
    pub book: Option<EntityRef>,
}

impl BookRegistration {
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }
}

impl Identified for BookRegistration {
    const KIND: EntityKind = EntityKind::BookRegistration;

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Create / replace registration request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRegistrationRequest {
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    pub student_id: Option<String>,
    pub request_date: Option<DateTime<Utc>>,
    pub request_status: Option<BookStatus>,
    pub return_date: Option<DateTime<Utc>>,
    #[validate(length(max = 500, message = "size must be between 0 and 500"))]
    pub remarks: Option<String>,
    pub book: Option<EntityRef>,
}

impl Identified for BookRegistrationRequest {
    const KIND: EntityKind = EntityKind::BookRegistration;

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl BookRegistrationRequest {
    /// Scalar fields as a record; `book` is set separately as a plain reference
    pub fn to_record(&self, id: EntityId) -> BookRegistration {
        BookRegistration {
            id: Some(id),
            student_id: self.student_id.clone(),
            request_date: self.request_date,
            request_status: self.request_status,
            return_date: self.return_date,
            remarks: self.remarks.clone(),
            book: None,
        }
    }
}

/// Partial registration update (merge-patch)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRegistrationPatch {
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub student_id: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub request_date: Patch<DateTime<Utc>>,
    #[serde(default)]
    #[schema(value_type = Option<BookStatus>)]
    pub request_status: Patch<BookStatus>,
    #[serde(default)]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub return_date: Patch<DateTime<Utc>>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub remarks: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<EntityRef>)]
    pub book: Patch<EntityRef>,
}

impl Identified for BookRegistrationPatch {
    const KIND: EntityKind = EntityKind::BookRegistration;

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl Validate for BookRegistrationPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_max_length(&mut errors, "remarks", &self.remarks, MAX_TEXT_LENGTH);
        into_result(errors)
    }
}
