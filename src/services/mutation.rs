//! Mutation validator
//!
//! Every write passes through [`decode`] and [`precheck`] before a store
//! transaction is opened: identity shape first (null check, then mismatch),
//! then typed decoding and field validation. Existence of the target is
//! checked afterwards, inside the transaction, by [`ensure_target_exists`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{EntityId, EntityKind, Identified},
    services::unit_of_work::UnitOfWork,
};

/// Requested write, as addressed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Replace { path_id: EntityId },
    Merge { path_id: EntityId },
    Delete { id: EntityId },
}

/// Write accepted by the identity checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteIntent {
    /// Persist under a freshly issued id
    Insert,
    /// Total overwrite of an existing record
    Overwrite(EntityId),
    /// Apply-if-present update of an existing record
    Merge(EntityId),
    /// Remove; absence is not an error
    Delete(EntityId),
}

impl Mutation {
    /// Identity-shape checks, in priority order
    pub fn check_identity(self, kind: EntityKind, body_id: Option<EntityId>) -> AppResult<WriteIntent> {
        let entity = kind.entity_name();
        match self {
            Mutation::Create => match body_id {
                Some(_) => Err(AppError::IdentityConflict { entity }),
                None => Ok(WriteIntent::Insert),
            },
            Mutation::Replace { path_id } | Mutation::Merge { path_id } => {
                let body_id = body_id.ok_or(AppError::MissingIdentity { entity })?;
                if body_id != path_id {
                    return Err(AppError::IdentityMismatch {
                        entity,
                        path_id,
                        body_id,
                    });
                }
                Ok(match self {
                    Mutation::Replace { .. } => WriteIntent::Overwrite(path_id),
                    _ => WriteIntent::Merge(path_id),
                })
            }
            Mutation::Delete { id } => Ok(WriteIntent::Delete(id)),
        }
    }
}

/// Decode a raw request body into `B`, running the identity checks on the
/// raw `id` first so a create carrying an id is a conflict even when the rest
/// of the body does not decode
pub fn decode<B>(mutation: Mutation, body: Value) -> AppResult<B>
where
    B: Identified + DeserializeOwned,
{
    let decoded = check_raw_identity(mutation, B::KIND, &body).and_then(|_| {
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))
    });

    if let Err(ref e) = decoded {
        tracing::warn!("Rejected {:?} on {}: {}", mutation, B::KIND, e);
    }
    decoded
}

fn check_raw_identity(mutation: Mutation, kind: EntityKind, body: &Value) -> AppResult<()> {
    match body.get("id").filter(|id| !id.is_null()) {
        None => mutation.check_identity(kind, None).map(|_| ()),
        Some(id) => match id.as_i64() {
            Some(id) => mutation.check_identity(kind, Some(id)).map(|_| ()),
            None if mutation == Mutation::Create => Err(AppError::IdentityConflict {
                entity: kind.entity_name(),
            }),
            // Non-numeric id: typed decoding reports it
            None => Ok(()),
        },
    }
}

/// Identity checks followed by field validation. Touches no store.
pub fn precheck<B>(mutation: Mutation, body: &B) -> AppResult<WriteIntent>
where
    B: Identified + Validate,
{
    let checked = mutation
        .check_identity(B::KIND, body.id())
        .and_then(|intent| {
            body.validate()?;
            Ok(intent)
        });

    if let Err(ref e) = checked {
        tracing::warn!("Rejected {:?} on {}: {}", mutation, B::KIND, e);
    }
    checked
}

/// Existence check for overwrite and merge targets; loads the target
pub async fn ensure_target_exists(uow: &mut UnitOfWork, kind: EntityKind, intent: WriteIntent) -> AppResult<()> {
    match intent {
        WriteIntent::Overwrite(id) | WriteIntent::Merge(id) => {
            if uow.load(kind, id).await? {
                Ok(())
            } else {
                tracing::warn!("Rejected write on missing {} {}", kind, id);
                Err(AppError::NotFound {
                    entity: kind.entity_name(),
                    id,
                })
            }
        }
        WriteIntent::Insert | WriteIntent::Delete(_) => Ok(()),
    }
}
