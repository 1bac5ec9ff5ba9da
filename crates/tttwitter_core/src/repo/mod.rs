//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define lookup/mutation contracts for users, roles, and tweets.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call the entity's `validate()` before any SQL mutation.
//! - Missing foreign keys are reported as `RepoError::ReferentialIntegrity`.
//! - Absent lookups return `Ok(None)`, never an error.
//! - Multi-statement writes run in one immediate transaction.

pub mod error;
pub mod role_repo;
mod schema;
pub mod tweet_repo;
pub mod user_repo;
