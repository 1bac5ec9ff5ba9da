//! CLI smoke entry point.
//!
//! Opens the configured database, seeds the reference roles, and prints a
//! one-line-per-fact storage summary.

use log::error;
use std::error::Error;
use std::process::ExitCode;
use tttwitter_core::db::open_db;
use tttwitter_core::{
    core_version, init_logging_from_config, CoreConfig, RoleService, SqliteRoleRepository,
    SqliteTweetRepository, SqliteUserRepository, TweetRepository, UserRepository,
};

fn main() -> ExitCode {
    let config = CoreConfig::from_env();

    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("tttwitter: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CoreConfig) -> Result<(), Box<dyn Error>> {
    let conn = open_db(&config.db_path)?;

    let roles = RoleService::new(SqliteRoleRepository::try_new(&conn)?).seed_reference_roles()?;
    let users = SqliteUserRepository::try_new(&conn)?;
    let tweets = SqliteTweetRepository::try_new(&conn)?;

    println!("tttwitter_core version={}", core_version());
    println!("db_path={}", config.db_path.display());
    println!(
        "roles={}",
        roles
            .iter()
            .map(|role| role.role.as_str())
            .collect::<Vec<_>>()
            .join(",")
    );
    println!("users={}", users.count_users()?);
    println!("tweets={}", tweets.count_tweets()?);
    Ok(())
}
