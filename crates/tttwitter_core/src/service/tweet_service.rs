//! Tweet use-case service.
//!
//! Owners are loaded only through [`TweetService::owner_of`].

use crate::model::tweet::Tweet;
use crate::model::user::{User, UserId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::tweet_repo::TweetRepository;
use crate::repo::user_repo::UserRepository;

/// Use-case service over tweets and their owners.
pub struct TweetService<T: TweetRepository, U: UserRepository> {
    tweets: T,
    users: U,
}

impl<T: TweetRepository, U: UserRepository> TweetService<T, U> {
    pub fn new(tweets: T, users: U) -> Self {
        Self { tweets, users }
    }

    /// Posts a message as `user_id`.
    pub fn post_tweet(&self, user_id: UserId, message: impl Into<String>) -> RepoResult<Tweet> {
        self.tweets.create_tweet(&Tweet::new(user_id, message))
    }

    /// Every tweet, newest first.
    pub fn timeline(&self) -> RepoResult<Vec<Tweet>> {
        self.tweets.find_all_order_by_created_at_desc()
    }

    pub fn tweets_for_user(&self, user_id: UserId) -> RepoResult<Vec<Tweet>> {
        self.tweets.find_all_by_user_order_by_created_at_desc(user_id)
    }

    /// Tweets of the named user; empty when the username is unknown.
    pub fn tweets_for_username(&self, username: &str) -> RepoResult<Vec<Tweet>> {
        match self.users.find_by_username(username)?.and_then(|user| user.id) {
            Some(user_id) => self.tweets_for_user(user_id),
            None => Ok(Vec::new()),
        }
    }

    /// Merged tweets of every user in `user_ids`, newest first.
    pub fn feed(&self, user_ids: &[UserId]) -> RepoResult<Vec<Tweet>> {
        self.tweets
            .find_all_by_user_in_order_by_created_at_desc(user_ids)
    }

    /// Loads the owning user of `tweet`.
    pub fn owner_of(&self, tweet: &Tweet) -> RepoResult<User> {
        self.users
            .find_by_id(tweet.user_id)?
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "tweet {:?} references missing user {}",
                    tweet.id, tweet.user_id
                ))
            })
    }
}
