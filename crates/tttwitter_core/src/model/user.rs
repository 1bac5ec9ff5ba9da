//! User entity.
//!
//! # Invariants
//! - `username` is 3 to 15 characters with no whitespace.
//! - `email` is non-empty and syntactically valid.
//! - `created_at` is set by storage on insert and never rewritten.
//! - `password` holds whatever the caller stores; the user service stores a hash.

use crate::model::role::Role;
use crate::model::validation::{
    check_email, check_not_empty, check_password, check_username, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Surrogate key assigned by storage.
pub type UserId = i64;

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// `None` until the user has been persisted.
    pub id: Option<UserId>,
    pub email: String,
    pub username: String,
    /// Never serialized; deserialized values default to empty.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Non-zero means the account is enabled.
    pub active: i32,
    /// Epoch milliseconds, assigned by storage.
    pub created_at: Option<i64>,
    /// Saving the user rewrites its `user_role` association to match this set.
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl User {
    /// Creates an unsaved, inactive user without roles.
    ///
    /// No field is checked here; see [`User::validate`].
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            email: email.into(),
            username: username.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            active: 0,
            created_at: None,
            roles: BTreeSet::new(),
        }
    }

    /// Checks every field constraint and reports the first violation.
    ///
    /// Roles are checked after the user's own fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_email(&self.email)?;
        check_username(&self.username)?;
        check_password(&self.password)?;
        check_not_empty(&self.first_name, ValidationError::FirstNameEmpty)?;
        check_not_empty(&self.last_name, ValidationError::LastNameEmpty)?;
        self.roles.iter().try_for_each(Role::validate)
    }

    pub fn is_active(&self) -> bool {
        self.active != 0
    }

    /// Returns whether the user holds a role with exactly this name.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|held| held.role == role)
    }
}
