//! Core use-case services.
//!
//! # Responsibility
//! - Wrap repository calls into use-case level APIs.
//! - Keep callers decoupled from storage details.

pub mod role_service;
pub mod tweet_service;
pub mod user_service;
