use tttwitter_core::db::open_db_in_memory;
use tttwitter_core::{
    verify_password, RegisterUserRequest, RepoError, RoleService, ServiceError,
    SqliteRoleRepository, SqliteTweetRepository, SqliteUserRepository, TweetService,
    UserRepository, UserService, ValidationError, REFERENCE_ROLES, ROLE_USER,
};

fn request(username: &str, password: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        email: format!("{username}@example.com"),
        username: username.to_string(),
        password: password.to_string(),
        first_name: "Linus".to_string(),
        last_name: "Torvalds".to_string(),
    }
}

#[test]
fn register_user_hashes_password_and_grants_user_role() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let user = service.register_user(request("linus", "penguin")).unwrap();

    assert!(user.is_active());
    assert!(user.has_role(ROLE_USER));
    assert_ne!(user.password, "penguin");
    assert!(verify_password("penguin", &user.password).unwrap());

    let stored: String = conn
        .query_row(
            "SELECT password FROM user WHERE user_id = ?1;",
            [user.id.unwrap()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, user.password);
}

#[test]
fn register_user_checks_raw_password_length() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let err = service.register_user(request("linus", "abc")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repo(RepoError::Validation(ValidationError::PasswordTooShort))
    ));
    assert!(service.find_by_username("linus").unwrap().is_none());
}

#[test]
fn registrations_share_one_user_role_row() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let first = service.register_user(request("alpha", "secret1")).unwrap();
    let second = service.register_user(request("bravo", "secret2")).unwrap();
    assert_eq!(first.roles, second.roles);

    let roles = RoleService::new(SqliteRoleRepository::try_new(&conn).unwrap());
    assert_eq!(roles.list_roles().unwrap().len(), 1);
}

#[test]
fn seed_reference_roles_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = RoleService::new(SqliteRoleRepository::try_new(&conn).unwrap());

    let first = service.seed_reference_roles().unwrap();
    let second = service.seed_reference_roles().unwrap();

    assert_eq!(first, second);
    let names: Vec<String> = first.into_iter().map(|role| role.role).collect();
    assert_eq!(names, REFERENCE_ROLES);
}

#[test]
fn tweet_service_covers_timeline_feed_and_owner() {
    let conn = open_db_in_memory().unwrap();
    let users = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let alice = users.register_user(request("alice", "secret")).unwrap();
    let bob = users.register_user(request("bob", "secret")).unwrap();
    let alice_id = alice.id.unwrap();
    let bob_id = bob.id.unwrap();

    let service = TweetService::new(
        SqliteTweetRepository::try_new(&conn).unwrap(),
        SqliteUserRepository::try_new(&conn).unwrap(),
    );
    let first = service.post_tweet(alice_id, "hi from alice").unwrap();
    service.post_tweet(bob_id, "hi from bob").unwrap();

    assert_eq!(service.timeline().unwrap().len(), 2);
    assert_eq!(service.feed(&[alice_id, bob_id]).unwrap().len(), 2);
    assert_eq!(service.tweets_for_user(bob_id).unwrap().len(), 1);
    assert_eq!(
        service.tweets_for_username("alice").unwrap(),
        vec![first.clone()]
    );
    assert!(service.tweets_for_username("nobody").unwrap().is_empty());

    let owner = service.owner_of(&first).unwrap();
    assert_eq!(owner, alice);

    users.delete_user(alice_id).unwrap();
    assert!(matches!(
        service.owner_of(&first).unwrap_err(),
        RepoError::InvalidData(_)
    ));
    assert_eq!(service.timeline().unwrap().len(), 1);
    assert!(SqliteUserRepository::try_new(&conn)
        .unwrap()
        .find_by_id(alice_id)
        .unwrap()
        .is_none());
}
