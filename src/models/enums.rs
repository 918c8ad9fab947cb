//! Shared domain enums

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Status of a book registration request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookStatus {
    Borrow,
    Cancel,
    Return,
}

impl BookStatus {
    /// Value stored in the `request_status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Borrow => "BORROW",
            BookStatus::Cancel => "CANCEL",
            BookStatus::Return => "RETURN",
        }
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BORROW" => Ok(BookStatus::Borrow),
            "CANCEL" => Ok(BookStatus::Cancel),
            "RETURN" => Ok(BookStatus::Return),
            other => Err(format!("unknown book status '{}'", other)),
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
