//! Field-presence wrapper for merge-patch bodies

use serde::{Deserialize, Deserializer};
use validator::{ValidationError, ValidationErrors};

/// State of one field in a merge-patch body.
///
/// A field missing from the JSON object deserialises to `Keep` (through
/// `#[serde(default)]`), an explicit `null` to `Clear`, anything else to `Set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Clear,
    Set(T),
}

// Manual impl: no `T: Default` bound
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Patch::Clear)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Overwrite `target` only when a value is present; `Keep` and `Clear`
    /// both leave it untouched. Returns whether `target` was written.
    pub fn apply_to(&self, target: &mut T) -> bool
    where
        T: Clone,
    {
        match self {
            Patch::Set(value) => {
                *target = value.clone();
                true
            }
            Patch::Keep | Patch::Clear => false,
        }
    }

    /// Same as [`Patch::apply_to`] for optional fields
    pub fn apply_to_option(&self, target: &mut Option<T>) -> bool
    where
        T: Clone,
    {
        match self {
            Patch::Set(value) => {
                *target = Some(value.clone());
                true
            }
            Patch::Keep | Patch::Clear => false,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Set(v),
            None => Patch::Clear,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// Reject an explicit `null` on a field that must never be empty
pub(crate) fn check_not_cleared<T>(errors: &mut ValidationErrors, field: &'static str, patch: &Patch<T>) {
    if patch.is_clear() {
        let mut error = ValidationError::new("required");
        error.message = Some("must not be null".into());
        errors.add(field, error);
    }
}

/// Length bound on a patched free-text field, counted in characters
pub(crate) fn check_max_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    patch: &Patch<String>,
    max: u64,
) {
    if let Patch::Set(value) = patch {
        if value.chars().count() as u64 > max {
            let mut error = ValidationError::new("length");
            error.message = Some(format!("size must be between 0 and {}", max).into());
            errors.add(field, error);
        }
    }
}

pub(crate) fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
