use tttwitter_core::db::open_db_in_memory;
use tttwitter_core::{
    RepoError, Role, RoleRepository, SqliteRoleRepository, SqliteUserRepository, User,
    UserRepository, ValidationError,
};

#[test]
fn find_by_role_matches_exact_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoleRepository::try_new(&conn).unwrap();

    let admin = repo.create_role(&Role::new("ADMIN")).unwrap();
    repo.create_role(&Role::new("USER")).unwrap();

    assert_eq!(repo.find_by_role("ADMIN").unwrap(), Some(admin.clone()));
    assert_eq!(repo.find_by_id(admin.id.unwrap()).unwrap(), Some(admin));
    assert_eq!(repo.find_by_role("admin").unwrap(), None);
}

#[test]
fn unknown_role_name_is_absent_not_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoleRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_role("MODERATOR").unwrap().is_none());
    assert!(repo.find_by_id(1).unwrap().is_none());
}

#[test]
fn blank_role_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoleRepository::try_new(&conn).unwrap();

    let err = repo.create_role(&Role::new("")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::RoleNameEmpty)
    ));
}

#[test]
fn role_held_by_user_cannot_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let roles = SqliteRoleRepository::try_new(&conn).unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();

    let admin = roles.create_role(&Role::new("ADMIN")).unwrap();
    let spare = roles.create_role(&Role::new("SPARE")).unwrap();
    let mut user = User::new("root@example.com", "root", "toor!", "Root", "User");
    user.roles.insert(admin.clone());
    users.create_user(&user).unwrap();

    let admin_id = admin.id.unwrap();
    let err = roles.delete_role(admin_id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ReferentialIntegrity {
            table: "user_role",
            column: "role_id",
            id
        } if id == admin_id
    ));

    roles.delete_role(spare.id.unwrap()).unwrap();
    assert_eq!(roles.find_all().unwrap(), vec![admin]);
    assert!(matches!(
        roles.delete_role(spare.id.unwrap()).unwrap_err(),
        RepoError::NotFound { entity: "role", .. }
    ));
}
