//! User use-case service.
//!
//! # Responsibility
//! - Turn registration input into a stored, active user with the `USER` role.
//! - Make sure only password hashes reach storage.
//!
//! # Invariants
//! - The raw password is validated before it is hashed.

use crate::model::role::{Role, ROLE_USER};
use crate::model::user::{User, UserId};
use crate::model::validation::ValidationError;
use crate::password::{hash_password, PasswordError};
use crate::repo::error::RepoError;
use crate::repo::user_repo::UserRepository;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from user use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Password(PasswordError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Password(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Password(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Repo(RepoError::Validation(value))
    }
}

impl From<PasswordError> for ServiceError {
    fn from(value: PasswordError) -> Self {
        Self::Password(value)
    }
}

/// Registration input; `password` is the raw secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Use-case service wrapper for user operations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers an active user holding the `USER` role.
    ///
    /// # Contract
    /// - Field constraints are checked against the raw password.
    /// - The stored password is an Argon2id hash.
    /// - The `USER` role row is created on first use.
    pub fn register_user(&self, request: RegisterUserRequest) -> ServiceResult<User> {
        let mut user = User::new(
            request.email,
            request.username,
            request.password,
            request.first_name,
            request.last_name,
        );
        user.active = 1;
        user.roles.insert(Role::new(ROLE_USER));
        user.validate()?;

        user.password = hash_password(&user.password)?;
        let saved = self.repo.create_user(&user)?;
        info!(
            "event=user_register module=service status=ok user_id={:?}",
            saved.id
        );
        Ok(saved)
    }

    pub fn find_by_id(&self, id: UserId) -> ServiceResult<Option<User>> {
        Ok(self.repo.find_by_id(id)?)
    }

    pub fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        Ok(self.repo.find_by_username(username)?)
    }

    /// Deletes the user together with its tweets.
    pub fn delete_user(&self, id: UserId) -> ServiceResult<()> {
        Ok(self.repo.delete_user(id)?)
    }
}
