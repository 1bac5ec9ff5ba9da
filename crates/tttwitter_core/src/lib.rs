//! Storage core for TTTwitter: users, roles, and tweets on SQLite.
//! This crate is the single source of truth for the data model's integrity rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod password;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::role::{Role, RoleId, ROLE_ADMIN, ROLE_USER};
pub use model::tweet::{Tweet, TweetId};
pub use model::user::{User, UserId};
pub use model::validation::ValidationError;
pub use password::{hash_password, verify_password, PasswordError};
pub use repo::error::{RepoError, RepoResult};
pub use repo::role_repo::{RoleRepository, SqliteRoleRepository};
pub use repo::tweet_repo::{SqliteTweetRepository, TweetRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::role_service::{RoleService, REFERENCE_ROLES};
pub use service::tweet_service::TweetService;
pub use service::user_service::{RegisterUserRequest, ServiceError, ServiceResult, UserService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
