//! Reference-role seeding.

use crate::model::role::{Role, ROLE_ADMIN, ROLE_USER};
use crate::repo::error::RepoResult;
use crate::repo::role_repo::RoleRepository;
use log::info;

/// Roles every deployment starts with.
pub const REFERENCE_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

/// Use-case service wrapper for role reference data.
pub struct RoleService<R: RoleRepository> {
    repo: R,
}

impl<R: RoleRepository> RoleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the role named `name`, creating it when missing.
    pub fn ensure_role(&self, name: &str) -> RepoResult<Role> {
        if let Some(existing) = self.repo.find_by_role(name)? {
            return Ok(existing);
        }
        let created = self.repo.create_role(&Role::new(name))?;
        info!(
            "event=role_seed module=service status=ok role_id={:?}",
            created.id
        );
        Ok(created)
    }

    /// Ensures every entry of [`REFERENCE_ROLES`] exists.
    pub fn seed_reference_roles(&self) -> RepoResult<Vec<Role>> {
        REFERENCE_ROLES
            .iter()
            .map(|name| self.ensure_role(name))
            .collect()
    }

    pub fn list_roles(&self) -> RepoResult<Vec<Role>> {
        self.repo.find_all()
    }
}
