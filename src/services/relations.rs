//! Relationship manager for the two one-to-many relations
//!
//! Book → BookRegistration and CategoryType → Book are both stored twice: as
//! an id set on the owner and as a back-reference on each child. The
//! operations below are the only writers of either side. They work on a
//! [`Catalog`] arena; every operation checks its preconditions before the
//! first write, so a failed operation leaves the arena untouched.

use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, EntityId, EntityKind, EntityRef},
};

/// Accessors for one owner → children relation
pub trait OneToMany {
    const OWNER: EntityKind;
    const CHILD: EntityKind;

    /// Ids of every owner currently in the arena
    fn owner_ids(catalog: &Catalog) -> Vec<EntityId>;

    /// Owner's collection, `None` when the owner is not in the arena
    fn children(catalog: &Catalog, owner: EntityId) -> Option<&BTreeSet<EntityRef>>;

    fn children_mut(catalog: &mut Catalog, owner: EntityId) -> Option<&mut BTreeSet<EntityRef>>;

    /// Child's back-reference, `None` when the child is not in the arena
    fn back_ref(catalog: &Catalog, child: EntityId) -> Option<Option<EntityRef>>;

    fn back_ref_mut(catalog: &mut Catalog, child: EntityId) -> Option<&mut Option<EntityRef>>;
}

/// `Book.bookRegistrations` ↔ `BookRegistration.book`
pub struct BookRegistrations;

/// `CategoryType.books` ↔ `Book.categoryType`
pub struct CategoryBooks;

impl OneToMany for BookRegistrations {
    const OWNER: EntityKind = EntityKind::Book;
    const CHILD: EntityKind = EntityKind::BookRegistration;

    fn owner_ids(catalog: &Catalog) -> Vec<EntityId> {
        catalog.books.keys().copied().collect()
    }

    fn children(catalog: &Catalog, owner: EntityId) -> Option<&BTreeSet<EntityRef>> {
        catalog.books.get(&owner).map(|b| &b.book_registrations)
    }

    fn children_mut(catalog: &mut Catalog, owner: EntityId) -> Option<&mut BTreeSet<EntityRef>> {
        catalog.books.get_mut(&owner).map(|b| &mut b.book_registrations)
    }

    fn back_ref(catalog: &Catalog, child: EntityId) -> Option<Option<EntityRef>> {
        catalog.book_registrations.get(&child).map(|r| r.book)
    }

    fn back_ref_mut(catalog: &mut Catalog, child: EntityId) -> Option<&mut Option<EntityRef>> {
        catalog.book_registrations.get_mut(&child).map(|r| &mut r.book)
    }
}

impl OneToMany for CategoryBooks {
    const OWNER: EntityKind = EntityKind::CategoryType;
    const CHILD: EntityKind = EntityKind::Book;

    fn owner_ids(catalog: &Catalog) -> Vec<EntityId> {
        catalog.category_types.keys().copied().collect()
    }

    fn children(catalog: &Catalog, owner: EntityId) -> Option<&BTreeSet<EntityRef>> {
        catalog.category_types.get(&owner).map(|c| &c.books)
    }

    fn children_mut(catalog: &mut Catalog, owner: EntityId) -> Option<&mut BTreeSet<EntityRef>> {
        catalog.category_types.get_mut(&owner).map(|c| &mut c.books)
    }

    fn back_ref(catalog: &Catalog, child: EntityId) -> Option<Option<EntityRef>> {
        catalog.books.get(&child).map(|b| b.category_type)
    }

    fn back_ref_mut(catalog: &mut Catalog, child: EntityId) -> Option<&mut Option<EntityRef>> {
        catalog.books.get_mut(&child).map(|b| &mut b.category_type)
    }
}

/// One mutation of a relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationOp {
    /// Replace the owner's whole collection, fixing every back-reference
    SetChildren {
        owner: EntityId,
        children: BTreeSet<EntityRef>,
    },
    /// Insert one child; a previous owner's collection is not touched
    AddChild { owner: EntityId, child: EntityId },
    /// Erase one child and clear its back-reference
    RemoveChild { owner: EntityId, child: EntityId },
    /// Write only the child's back-reference
    SetOwner {
        child: EntityId,
        owner: Option<EntityId>,
    },
}

/// Apply `op` to the arena in place
pub fn apply<R: OneToMany>(catalog: &mut Catalog, op: RelationOp) -> AppResult<()> {
    match op {
        RelationOp::SetChildren { owner, children } => set_children::<R>(catalog, owner, children),
        RelationOp::AddChild { owner, child } => add_child::<R>(catalog, owner, child),
        RelationOp::RemoveChild { owner, child } => remove_child::<R>(catalog, owner, child),
        RelationOp::SetOwner { child, owner } => set_owner::<R>(catalog, child, owner),
    }
}

/// Snapshot form of [`apply`]: consumes one arena and returns the next
pub fn applied<R: OneToMany>(mut catalog: Catalog, op: RelationOp) -> AppResult<Catalog> {
    apply::<R>(&mut catalog, op)?;
    Ok(catalog)
}

pub fn set_children<R: OneToMany>(
    catalog: &mut Catalog,
    owner: EntityId,
    children: BTreeSet<EntityRef>,
) -> AppResult<()> {
    let previous = require_owner::<R>(catalog, owner)?.clone();
    for child in &children {
        require_child::<R>(catalog, child.id)?;
    }

    for old in previous.iter().filter(|c| !children.contains(c)) {
        if let Some(back_ref) = R::back_ref_mut(catalog, old.id) {
            *back_ref = None;
        }
    }
    for child in &children {
        if let Some(back_ref) = R::back_ref_mut(catalog, child.id) {
            *back_ref = Some(EntityRef::new(owner));
        }
    }
    if let Some(collection) = R::children_mut(catalog, owner) {
        *collection = children;
    }
    Ok(())
}

pub fn add_child<R: OneToMany>(catalog: &mut Catalog, owner: EntityId, child: EntityId) -> AppResult<()> {
    require_owner::<R>(catalog, owner)?;
    require_child::<R>(catalog, child)?;

    if let Some(collection) = R::children_mut(catalog, owner) {
        collection.insert(EntityRef::new(child));
    }
    if let Some(back_ref) = R::back_ref_mut(catalog, child) {
        *back_ref = Some(EntityRef::new(owner));
    }
    Ok(())
}

pub fn remove_child<R: OneToMany>(catalog: &mut Catalog, owner: EntityId, child: EntityId) -> AppResult<()> {
    require_owner::<R>(catalog, owner)?;

    if let Some(collection) = R::children_mut(catalog, owner) {
        collection.remove(&EntityRef::new(child));
    }
    if let Some(back_ref) = R::back_ref_mut(catalog, child) {
        *back_ref = None;
    }
    Ok(())
}

pub fn set_owner<R: OneToMany>(catalog: &mut Catalog, child: EntityId, owner: Option<EntityId>) -> AppResult<()> {
    let back_ref = R::back_ref_mut(catalog, child).ok_or_else(|| missing(R::CHILD, child))?;
    *back_ref = owner.map(EntityRef::new);
    Ok(())
}

/// Remove `child` from every owner collection except `keep`'s: the owner its
/// back-reference names, and any owner in the arena that still lists it after
/// a one-sided reference write. Owners absent from the arena are skipped.
pub fn detach_from_other_owners<R: OneToMany>(
    catalog: &mut Catalog,
    child: EntityId,
    keep: Option<EntityId>,
) -> AppResult<()> {
    let current = R::back_ref(catalog, child).ok_or_else(|| missing(R::CHILD, child))?;
    let listed = EntityRef::new(child);
    let mut owners: BTreeSet<EntityId> = R::owner_ids(catalog)
        .into_iter()
        .filter(|owner| R::children(catalog, *owner).is_some_and(|c| c.contains(&listed)))
        .collect();
    if let Some(previous) = current {
        if R::children(catalog, previous.id).is_some() {
            owners.insert(previous.id);
        }
    }

    for owner in owners.into_iter().filter(|owner| Some(*owner) != keep) {
        if let Some(collection) = R::children_mut(catalog, owner) {
            collection.remove(&listed);
        }
        if current.map(|r| r.id) == Some(owner) {
            if let Some(back_ref) = R::back_ref_mut(catalog, child) {
                *back_ref = None;
            }
        }
    }
    Ok(())
}

/// Move `child` under `owner`: detach from any other owner, then add
pub fn relink<R: OneToMany>(catalog: &mut Catalog, child: EntityId, owner: EntityId) -> AppResult<()> {
    require_owner::<R>(catalog, owner)?;
    detach_from_other_owners::<R>(catalog, child, Some(owner))?;
    add_child::<R>(catalog, owner, child)
}

/// Set the owner's collection after detaching each incoming child from its
/// current owner, so no other collection keeps a stale entry
pub fn adopt_children<R: OneToMany>(
    catalog: &mut Catalog,
    owner: EntityId,
    children: BTreeSet<EntityRef>,
) -> AppResult<()> {
    require_owner::<R>(catalog, owner)?;
    for child in &children {
        require_child::<R>(catalog, child.id)?;
    }
    for child in &children {
        detach_from_other_owners::<R>(catalog, child.id, Some(owner))?;
    }
    set_children::<R>(catalog, owner, children)
}

/// Pairs `(owner, child)` where the child sits in the owner's collection but
/// its back-reference names someone else. Children absent from the arena are skipped.
pub fn inconsistencies<R: OneToMany>(catalog: &Catalog, owners: impl IntoIterator<Item = EntityId>) -> Vec<(EntityId, EntityId)> {
    let mut found = Vec::new();
    for owner in owners {
        let Some(children) = R::children(catalog, owner) else {
            continue;
        };
        for child in children {
            if let Some(back_ref) = R::back_ref(catalog, child.id) {
                if back_ref != Some(EntityRef::new(owner)) {
                    found.push((owner, child.id));
                }
            }
        }
    }
    found
}

fn require_owner<R: OneToMany>(catalog: &Catalog, owner: EntityId) -> AppResult<&BTreeSet<EntityRef>> {
    R::children(catalog, owner).ok_or_else(|| missing(R::OWNER, owner))
}

fn require_child<R: OneToMany>(catalog: &Catalog, child: EntityId) -> AppResult<()> {
    R::back_ref(catalog, child)
        .map(|_| ())
        .ok_or_else(|| missing(R::CHILD, child))
}

fn missing(kind: EntityKind, id: EntityId) -> AppError {
    AppError::Validation(format!("{} {} does not exist", kind, id))
}
