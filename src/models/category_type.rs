//! Category type model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::patch::{check_max_length, check_not_cleared, into_result, Patch};
use super::{EntityId, EntityKind, EntityRef, Identified, MAX_TEXT_LENGTH};

/// Category of books
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryType {
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = Vec<EntityRef>)]
    pub books: BTreeSet<EntityRef>,
}

impl CategoryType {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }
}

impl Identified for CategoryType {
    const KIND: EntityKind = EntityKind::CategoryType;

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Create / replace category type request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTypeRequest {
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    #[validate(required(message = "must not be null"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "size must be between 0 and 500"))]
    pub description: Option<String>,
    pub books: Option<Vec<EntityRef>>,
}

impl Identified for CategoryTypeRequest {
    const KIND: EntityKind = EntityKind::CategoryType;

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl CategoryTypeRequest {
    pub fn to_record(&self, id: EntityId) -> CategoryType {
        CategoryType {
            id: Some(id),
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone(),
            books: BTreeSet::new(),
        }
    }

    pub fn book_refs(&self) -> BTreeSet<EntityRef> {
        self.books.iter().flatten().copied().collect()
    }
}

/// Partial category type update (merge-patch)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTypePatch {
    #[schema(value_type = Option<i64>)]
    pub id: Option<EntityId>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<EntityRef>>)]
    pub books: Patch<Vec<EntityRef>>,
}

impl Identified for CategoryTypePatch {
    const KIND: EntityKind = EntityKind::CategoryType;

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl Validate for CategoryTypePatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_not_cleared(&mut errors, "title", &self.title);
        check_max_length(&mut errors, "description", &self.description, MAX_TEXT_LENGTH);
        into_result(errors)
    }
}
