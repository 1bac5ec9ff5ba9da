//! Role reference data.

use crate::model::validation::{check_not_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Surrogate key assigned by storage.
pub type RoleId = i64;

/// Role granted to regular accounts on registration.
pub const ROLE_USER: &str = "USER";
/// Role for administrative accounts.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Named role that users can hold.
///
/// Ordering is derived so roles can live in a `BTreeSet` on `User`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Role {
    /// `None` until the role has been persisted.
    pub id: Option<RoleId>,
    /// Exact role name, e.g. `ADMIN` or `USER`.
    pub role: String,
}

impl Role {
    /// Creates an unsaved role with the given name.
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            id: None,
            role: role.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_not_empty(&self.role, ValidationError::RoleNameEmpty)
    }
}
