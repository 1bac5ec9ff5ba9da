//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and username lookup over the `user` table.
//! - Keep the `user_role` association in step with `User::roles` on every save.
//! - Delete a user together with its tweets and role links.
//!
//! # Invariants
//! - `created_at` is written by the column default and never updated.
//! - Saving and deleting run inside one immediate transaction each.
//! - Username and email are not unique at the schema level; lookups by
//!   username return the lowest id when duplicates exist.

use crate::model::role::Role;
use crate::model::user::{User, UserId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::role_repo::{insert_role, load_role_by_id, load_role_by_name, parse_role_row};
use crate::repo::schema::{count_to_u64, ensure_connection_ready, row_exists};
use log::{debug, info};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;

const USER_SELECT_SQL: &str = "SELECT
    user_id,
    email,
    username,
    password,
    first_name,
    last_name,
    active,
    created_at
FROM user";

/// Repository interface for user CRUD operations.
pub trait UserRepository {
    /// Inserts the user and its role links, returning the stored user.
    ///
    /// Any `id`/`created_at` already on `user` is ignored.
    fn create_user(&self, user: &User) -> RepoResult<User>;
    /// Rewrites every mutable column and the role links of an existing user.
    fn update_user(&self, user: &User) -> RepoResult<User>;
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Exact-match lookup; `Ok(None)` when no user has this username.
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    /// All users ordered by id.
    fn find_all(&self) -> RepoResult<Vec<User>>;
    fn count_users(&self) -> RepoResult<u64>;
    fn exists_by_id(&self, id: UserId) -> RepoResult<bool>;
    /// Deletes the user, its tweets and its role links atomically.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["user", "role", "user_role", "tweet"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<User> {
        user.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO user (
                email,
                username,
                password,
                first_name,
                last_name,
                active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                user.email.as_str(),
                user.username.as_str(),
                user.password.as_str(),
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.active,
            ],
        )?;
        let id = tx.last_insert_rowid();

        let roles = persist_roles(&tx, &user.roles)?;
        replace_user_roles(&tx, id, &roles)?;
        let saved = load_required_user(&tx, id)?;
        tx.commit()?;

        info!(
            "event=user_create module=repo status=ok user_id={id} role_count={}",
            roles.len()
        );
        Ok(saved)
    }

    fn update_user(&self, user: &User) -> RepoResult<User> {
        let id = user.id.ok_or(RepoError::Unsaved { entity: "user" })?;
        user.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE user
             SET
                email = ?1,
                username = ?2,
                password = ?3,
                first_name = ?4,
                last_name = ?5,
                active = ?6
             WHERE user_id = ?7;",
            params![
                user.email.as_str(),
                user.username.as_str(),
                user.password.as_str(),
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.active,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "user", id });
        }

        let roles = persist_roles(&tx, &user.roles)?;
        replace_user_roles(&tx, id, &roles)?;
        let saved = load_required_user(&tx, id)?;
        tx.commit()?;

        info!(
            "event=user_update module=repo status=ok user_id={id} role_count={}",
            roles.len()
        );
        Ok(saved)
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        load_user(self.conn, id)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "{USER_SELECT_SQL}
             WHERE username = ?1
             ORDER BY user_id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([username])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let user = parse_user_row(row)?;
        Ok(Some(attach_roles(self.conn, user)?))
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY user_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        users
            .into_iter()
            .map(|user| attach_roles(self.conn, user))
            .collect()
    }

    fn count_users(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM user;", [], |row| row.get(0))?;
        count_to_u64(count, "user")
    }

    fn exists_by_id(&self, id: UserId) -> RepoResult<bool> {
        row_exists(self.conn, "user", "user_id", id)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !row_exists(&tx, "user", "user_id", id)? {
            return Err(RepoError::NotFound { entity: "user", id });
        }

        // Dependents first; the owner row goes last.
        let tweets_deleted = tx.execute("DELETE FROM tweet WHERE user_id = ?1;", [id])?;
        let roles_unlinked = tx.execute("DELETE FROM user_role WHERE user_id = ?1;", [id])?;
        tx.execute("DELETE FROM user WHERE user_id = ?1;", [id])?;
        tx.commit()?;

        info!(
            "event=user_delete module=repo status=ok user_id={id} tweets_deleted={tweets_deleted} roles_unlinked={roles_unlinked}"
        );
        Ok(())
    }
}

fn load_user(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE user_id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let user = parse_user_row(row)?;
    Ok(Some(attach_roles(conn, user)?))
}

fn load_required_user(conn: &Connection, id: UserId) -> RepoResult<User> {
    load_user(conn, id)?.ok_or(RepoError::NotFound { entity: "user", id })
}

fn attach_roles(conn: &Connection, mut user: User) -> RepoResult<User> {
    if let Some(id) = user.id {
        user.roles = load_roles_for_user(conn, id)?;
    }
    user.validate().map_err(|err| {
        RepoError::InvalidData(format!("user {:?} failed validation: {err}", user.id))
    })?;
    Ok(user)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: Some(row.get("user_id")?),
        email: row.get("email")?,
        username: row.get("username")?,
        password: row.get("password")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        active: row.get("active")?,
        created_at: Some(row.get("created_at")?),
        roles: BTreeSet::new(),
    })
}

fn load_roles_for_user(conn: &Connection, user_id: UserId) -> RepoResult<BTreeSet<Role>> {
    let mut stmt = conn.prepare(
        "SELECT r.role_id, r.role
         FROM user_role ur
         INNER JOIN role r ON r.role_id = ur.role_id
         WHERE ur.user_id = ?1
         ORDER BY r.role_id ASC;",
    )?;
    let mut rows = stmt.query([user_id])?;
    let mut roles = BTreeSet::new();
    while let Some(row) = rows.next()? {
        roles.insert(parse_role_row(row)?);
    }
    Ok(roles)
}

/// Resolves every role of the set to a stored row.
///
/// Roles with an id must already exist under the same name; a renamed role is
/// rejected rather than silently replaced. Roles without an id are matched by
/// name first and inserted only when no row carries that name.
fn persist_roles(conn: &Connection, roles: &BTreeSet<Role>) -> RepoResult<BTreeSet<Role>> {
    let mut persisted = BTreeSet::new();
    for role in roles {
        let stored = match role.id {
            Some(id) => {
                let stored = load_role_by_id(conn, id)?.ok_or(RepoError::ReferentialIntegrity {
                    table: "user_role",
                    column: "role_id",
                    id,
                })?;
                if stored.role != role.role {
                    return Err(RepoError::RoleMismatch {
                        id,
                        given: role.role.clone(),
                        stored: stored.role,
                    });
                }
                stored
            }
            None => match load_role_by_name(conn, &role.role)? {
                Some(existing) => existing,
                None => {
                    let created = insert_role(conn, role)?;
                    debug!(
                        "event=role_cascade_insert module=repo status=ok role_id={:?}",
                        created.id
                    );
                    created
                }
            },
        };
        persisted.insert(stored);
    }
    Ok(persisted)
}

fn replace_user_roles(conn: &Connection, user_id: UserId, roles: &BTreeSet<Role>) -> RepoResult<()> {
    conn.execute("DELETE FROM user_role WHERE user_id = ?1;", [user_id])?;
    for role in roles {
        let Some(role_id) = role.id else {
            return Err(RepoError::InvalidData(format!(
                "role `{}` reached user_role without an id",
                role.role
            )));
        };
        conn.execute(
            "INSERT OR IGNORE INTO user_role (user_id, role_id) VALUES (?1, ?2);",
            params![user_id, role_id],
        )?;
    }
    Ok(())
}
