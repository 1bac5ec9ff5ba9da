//! Tweet repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD plus the timeline/feed listings over the `tweet` table.
//!
//! # Invariants
//! - Every write checks that `user_id` names an existing user.
//! - Listings are ordered `created_at DESC, tweet_id ASC`: equal timestamps
//!   keep insertion order.
//! - The feed binds its user set as one `rarray` parameter, so the set size is
//!   not limited by SQLite's bound-variable cap.
//! - `created_at` is written by the column default and never updated.

use crate::model::tweet::{Tweet, TweetId};
use crate::model::user::UserId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{count_to_u64, ensure_connection_ready, row_exists};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, Connection, Params, Row};
use std::rc::Rc;

const TWEET_SELECT_SQL: &str = "SELECT
    tweet_id,
    user_id,
    message,
    created_at
FROM tweet";

const NEWEST_FIRST_SQL: &str = " ORDER BY created_at DESC, tweet_id ASC";

/// Repository interface for tweet operations.
pub trait TweetRepository {
    /// Inserts the tweet and returns it with id and `created_at` filled in.
    fn create_tweet(&self, tweet: &Tweet) -> RepoResult<Tweet>;
    /// Rewrites `user_id` and `message` of an existing tweet.
    fn update_tweet(&self, tweet: &Tweet) -> RepoResult<Tweet>;
    fn find_by_id(&self, id: TweetId) -> RepoResult<Option<Tweet>>;
    /// Every tweet, newest first.
    fn find_all_order_by_created_at_desc(&self) -> RepoResult<Vec<Tweet>>;
    /// Tweets of one user, newest first.
    fn find_all_by_user_order_by_created_at_desc(&self, user_id: UserId)
        -> RepoResult<Vec<Tweet>>;
    /// Tweets of any of the given users merged into one list, newest first.
    fn find_all_by_user_in_order_by_created_at_desc(
        &self,
        user_ids: &[UserId],
    ) -> RepoResult<Vec<Tweet>>;
    fn count_by_user(&self, user_id: UserId) -> RepoResult<u64>;
    fn count_tweets(&self) -> RepoResult<u64>;
    fn delete_tweet(&self, id: TweetId) -> RepoResult<()>;
}

/// SQLite-backed tweet repository.
pub struct SqliteTweetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTweetRepository<'conn> {
    /// Creates repository from migrated connection.
    ///
    /// The feed needs the `rarray` module that `open_db` registers.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["user", "tweet"])?;
        Ok(Self { conn })
    }

    fn ensure_owner_exists(&self, user_id: UserId) -> RepoResult<()> {
        if row_exists(self.conn, "user", "user_id", user_id)? {
            Ok(())
        } else {
            Err(RepoError::ReferentialIntegrity {
                table: "tweet",
                column: "user_id",
                id: user_id,
            })
        }
    }

    fn query_tweets<P: Params>(&self, sql: &str, params: P) -> RepoResult<Vec<Tweet>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut tweets = Vec::new();
        while let Some(row) = rows.next()? {
            tweets.push(parse_tweet_row(row)?);
        }
        Ok(tweets)
    }
}

impl TweetRepository for SqliteTweetRepository<'_> {
    fn create_tweet(&self, tweet: &Tweet) -> RepoResult<Tweet> {
        tweet.validate()?;
        self.ensure_owner_exists(tweet.user_id)?;

        self.conn.execute(
            "INSERT INTO tweet (user_id, message) VALUES (?1, ?2);",
            params![tweet.user_id, tweet.message.as_str()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(
            "event=tweet_create module=repo status=ok tweet_id={id} user_id={}",
            tweet.user_id
        );

        self.find_by_id(id)?
            .ok_or(RepoError::NotFound { entity: "tweet", id })
    }

    fn update_tweet(&self, tweet: &Tweet) -> RepoResult<Tweet> {
        let id = tweet.id.ok_or(RepoError::Unsaved { entity: "tweet" })?;
        tweet.validate()?;
        self.ensure_owner_exists(tweet.user_id)?;

        let changed = self.conn.execute(
            "UPDATE tweet
             SET
                user_id = ?1,
                message = ?2
             WHERE tweet_id = ?3;",
            params![tweet.user_id, tweet.message.as_str(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "tweet", id });
        }

        self.find_by_id(id)?
            .ok_or(RepoError::NotFound { entity: "tweet", id })
    }

    fn find_by_id(&self, id: TweetId) -> RepoResult<Option<Tweet>> {
        let tweets = self.query_tweets(
            &format!("{TWEET_SELECT_SQL} WHERE tweet_id = ?1;"),
            [id],
        )?;
        Ok(tweets.into_iter().next())
    }

    fn find_all_order_by_created_at_desc(&self) -> RepoResult<Vec<Tweet>> {
        self.query_tweets(&format!("{TWEET_SELECT_SQL}{NEWEST_FIRST_SQL};"), [])
    }

    fn find_all_by_user_order_by_created_at_desc(
        &self,
        user_id: UserId,
    ) -> RepoResult<Vec<Tweet>> {
        self.query_tweets(
            &format!("{TWEET_SELECT_SQL} WHERE user_id = ?1{NEWEST_FIRST_SQL};"),
            [user_id],
        )
    }

    fn find_all_by_user_in_order_by_created_at_desc(
        &self,
        user_ids: &[UserId],
    ) -> RepoResult<Vec<Tweet>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Rc<Vec<Value>> = Rc::new(user_ids.iter().copied().map(Value::from).collect());
        self.query_tweets(
            &format!("{TWEET_SELECT_SQL} WHERE user_id IN rarray(?1){NEWEST_FIRST_SQL};"),
            params![ids],
        )
    }

    fn count_by_user(&self, user_id: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tweet WHERE user_id = ?1;",
            [user_id],
            |row| row.get(0),
        )?;
        count_to_u64(count, "tweet")
    }

    fn count_tweets(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tweet;", [], |row| row.get(0))?;
        count_to_u64(count, "tweet")
    }

    fn delete_tweet(&self, id: TweetId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tweet WHERE tweet_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "tweet", id });
        }
        debug!("event=tweet_delete module=repo status=ok tweet_id={id}");
        Ok(())
    }
}

fn parse_tweet_row(row: &Row<'_>) -> RepoResult<Tweet> {
    let tweet = Tweet {
        id: Some(row.get("tweet_id")?),
        user_id: row.get("user_id")?,
        message: row.get("message")?,
        created_at: Some(row.get("created_at")?),
    };
    tweet.validate().map_err(|err| {
        RepoError::InvalidData(format!("tweet {:?} failed validation: {err}", tweet.id))
    })?;
    Ok(tweet)
}
