//! Storage layer for board-service
//!
//! `Store` is the seam the services talk to. `PgStore` runs every mutation
//! as one PostgreSQL transaction; `InMemoryStore` serializes operations
//! behind a single lock and backs local runs and tests.
pub mod comment_repo;
pub mod like_repo;
pub mod memory;
pub mod post_repo;
pub mod postgres;
pub mod user_repo;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use crate::error::Result;
use crate::models::{Comment, LikeStatus, Post, User};
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `EmailAlreadyRegistered` when the email is taken.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn create_post(&self, owner_id: i64, title: &str, content: &str) -> Result<Post>;

    async fn find_post(&self, post_id: i64) -> Result<Option<Post>>;

    /// Newest first.
    async fn list_posts(&self, skip: i64, limit: i64) -> Result<Vec<Post>>;

    /// Rewrites title and content only when `owner_id` still owns the post.
    async fn update_post(
        &self,
        post_id: i64,
        owner_id: i64,
        title: &str,
        content: &str,
    ) -> Result<Option<Post>>;

    /// Removes the post with its likes and comments; `false` if no row
    /// owned by `owner_id` matched.
    async fn delete_post(&self, post_id: i64, owner_id: i64) -> Result<bool>;

    /// Atomically flips the caller's like and returns the resulting count.
    /// Fails with `PostNotFound` when the post does not exist.
    async fn toggle_like(&self, user_id: i64, post_id: i64) -> Result<LikeStatus>;

    async fn count_likes(&self, post_id: i64) -> Result<i64>;

    async fn has_liked(&self, user_id: i64, post_id: i64) -> Result<bool>;

    /// Fails with `PostNotFound` when the post does not exist.
    async fn create_comment(&self, user_id: i64, post_id: i64, content: &str) -> Result<Comment>;

    /// Oldest first.
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>>;

    async fn ping(&self) -> Result<()>;
}
