//! Persisted entities of the TTTwitter core.
//!
//! # Responsibility
//! - Define the shape of users, roles, and tweets.
//! - Keep field constraints next to the data they guard.
//!
//! # Invariants
//! - Constraints are checked by `validate()` at write time, never by constructors.
//! - Ids and `created_at` are assigned by storage; a fresh entity carries `None`.

pub mod role;
pub mod tweet;
pub mod user;
pub mod validation;
