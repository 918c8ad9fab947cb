//! Book model and request bodies

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::patch::{check_max_length, check_not_cleared, into_result, Patch};
use super::{EntityId, EntityKind, EntityRef, Identified, MAX_TEXT_LENGTH};

/// Book record
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    pub author: String,
    pub title: String,
    /// Free text, at most 500 characters
    pub description: Option<String>,
    /// Category this book points at; not reciprocated automatically
    pub category_type: Option<EntityRef>,
    /// Registrations owned by this book
    #[schema(value_type = Vec<EntityRef>)]
    pub book_registrations: BTreeSet<EntityRef>,
}

impl Book {
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Identified for Book {
    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Create / replace book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    /// Must be absent on create, equal to the path id on replace
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    #[validate(required(message = "must not be null"))]
    pub author: Option<String>,
    #[validate(required(message = "must not be null"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "size must be between 0 and 500"))]
    pub description: Option<String>,
    pub category_type: Option<EntityRef>,
    /// Full set of registrations; omitted means empty
    pub book_registrations: Option<Vec<EntityRef>>,
}

impl Identified for BookRequest {
    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl BookRequest {
    /// Scalar fields of a validated request as a record under `id`.
    /// Relations are left empty; they are linked by the relationship manager.
    pub fn to_record(&self, id: EntityId) -> Book {
        Book {
            id: Some(id),
            author: self.author.clone().unwrap_or_default(),
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone(),
            category_type: None,
            book_registrations: BTreeSet::new(),
        }
    }

    pub fn registration_refs(&self) -> BTreeSet<EntityRef> {
        self.book_registrations
            .iter()
            .flatten()
            .copied()
            .collect()
    }
}

/// Partial book update (merge-patch)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub author: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<EntityRef>)]
    pub category_type: Patch<EntityRef>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<EntityRef>>)]
    pub book_registrations: Patch<Vec<EntityRef>>,
}

impl Identified for BookPatch {
    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl Validate for BookPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_not_cleared(&mut errors, "author", &self.author);
        check_not_cleared(&mut errors, "title", &self.title);
        check_max_length(&mut errors, "description", &self.description, MAX_TEXT_LENGTH);
        into_result(errors)
    }
}
