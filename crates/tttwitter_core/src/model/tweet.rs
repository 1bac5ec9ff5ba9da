//! Tweet entity.
//!
//! # Invariants
//! - `user_id` always names an existing user once persisted.
//! - `message` holds 1 to 280 characters.
//! - `created_at` is set by storage on insert and never rewritten.

use crate::model::user::UserId;
use crate::model::validation::{check_message, ValidationError};
use serde::{Deserialize, Serialize};

/// Surrogate key assigned by storage.
pub type TweetId = i64;

/// Short message posted by one user.
///
/// The owner is referenced by id only; load it explicitly when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    /// `None` until the tweet has been persisted.
    pub id: Option<TweetId>,
    /// Owning user.
    pub user_id: UserId,
    pub message: String,
    /// Epoch milliseconds, assigned by storage.
    pub created_at: Option<i64>,
}

impl Tweet {
    /// Creates an unsaved tweet owned by `user_id`.
    ///
    /// The message is not checked here; see [`Tweet::validate`].
    pub fn new(user_id: UserId, message: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id,
            message: message.into(),
            created_at: None,
        }
    }

    /// Checks the message length bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_message(&self.message)
    }
}
