//! Role repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Lookup by name is exact (case-sensitive); the lowest id wins when a name repeats.
//! - A role still held by any user cannot be deleted.

use crate::model::role::{Role, RoleId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{count_to_u64, ensure_connection_ready, row_exists};
use log::info;
use rusqlite::{params, Connection, Row};

const ROLE_SELECT_SQL: &str = "SELECT role_id, role FROM role";

/// Repository interface for role reference data.
pub trait RoleRepository {
    /// Inserts a role and returns it with its assigned id.
    fn create_role(&self, role: &Role) -> RepoResult<Role>;
    fn find_by_id(&self, id: RoleId) -> RepoResult<Option<Role>>;
    /// Exact-name lookup; `Ok(None)` when no role carries this name.
    fn find_by_role(&self, role: &str) -> RepoResult<Option<Role>>;
    /// All roles ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Role>>;
    /// Deletes an unreferenced role.
    fn delete_role(&self, id: RoleId) -> RepoResult<()>;
}

/// SQLite-backed role repository.
pub struct SqliteRoleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoleRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["role", "user_role"])?;
        Ok(Self { conn })
    }
}

impl RoleRepository for SqliteRoleRepository<'_> {
    fn create_role(&self, role: &Role) -> RepoResult<Role> {
        insert_role(self.conn, role)
    }

    fn find_by_id(&self, id: RoleId) -> RepoResult<Option<Role>> {
        load_role_by_id(self.conn, id)
    }

    fn find_by_role(&self, role: &str) -> RepoResult<Option<Role>> {
        load_role_by_name(self.conn, role)
    }

    fn find_all(&self) -> RepoResult<Vec<Role>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROLE_SELECT_SQL} ORDER BY role_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut roles = Vec::new();
        while let Some(row) = rows.next()? {
            roles.push(parse_role_row(row)?);
        }
        Ok(roles)
    }

    fn delete_role(&self, id: RoleId) -> RepoResult<()> {
        if !row_exists(self.conn, "role", "role_id", id)? {
            return Err(RepoError::NotFound { entity: "role", id });
        }

        let holders: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM user_role WHERE role_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        if holders > 0 {
            info!(
                "event=role_delete module=repo status=rejected role_id={id} holders={} error_code=role_in_use",
                count_to_u64(holders, "user_role")?
            );
            return Err(RepoError::ReferentialIntegrity {
                table: "user_role",
                column: "role_id",
                id,
            });
        }

        self.conn
            .execute("DELETE FROM role WHERE role_id = ?1;", [id])?;
        info!("event=role_delete module=repo status=ok role_id={id}");
        Ok(())
    }
}

pub(crate) fn insert_role(conn: &Connection, role: &Role) -> RepoResult<Role> {
    role.validate()?;
    conn.execute(
        "INSERT INTO role (role) VALUES (?1);",
        params![role.role.as_str()],
    )?;
    Ok(Role {
        id: Some(conn.last_insert_rowid()),
        role: role.role.clone(),
    })
}

pub(crate) fn load_role_by_id(conn: &Connection, id: RoleId) -> RepoResult<Option<Role>> {
    let mut stmt = conn.prepare(&format!("{ROLE_SELECT_SQL} WHERE role_id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_role_row(row)?));
    }

    Ok(None)
}

pub(crate) fn load_role_by_name(conn: &Connection, role: &str) -> RepoResult<Option<Role>> {
    let mut stmt = conn.prepare(&format!(
        "{ROLE_SELECT_SQL} WHERE role = ?1 ORDER BY role_id ASC LIMIT 1;"
    ))?;
    let mut rows = stmt.query([role])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_role_row(row)?));
    }

    Ok(None)
}

pub(crate) fn parse_role_row(row: &Row<'_>) -> RepoResult<Role> {
    Ok(Role {
        id: Some(row.get("role_id")?),
        role: row.get("role")?,
    })
}
