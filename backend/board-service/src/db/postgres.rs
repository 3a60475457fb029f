use super::{comment_repo, like_repo, post_repo, user_repo, Store};
use crate::error::{AppError, Result};
use crate::models::{Comment, LikeStatus, Post, User};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// PostgreSQL-backed store. Dropping an uncommitted transaction rolls it
/// back, so every early return below leaves the database untouched.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Foreign keys that point at `users(id)`.
const USER_FOREIGN_KEYS: [&str; 3] = [
    "posts_owner_id_fkey",
    "likes_user_id_fkey",
    "comments_user_id_fkey",
];

/// Map a failed insert that references a missing row: a vanished author is
/// unauthenticated, anything else is a missing post.
fn missing_reference(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            let user_key = db_err
                .constraint()
                .is_some_and(|name| USER_FOREIGN_KEYS.contains(&name));
            return if user_key {
                AppError::Unauthenticated
            } else {
                AppError::PostNotFound
            };
        }
    }
    err.into()
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User> {
        user_repo::create_user(&self.pool, email, hashed_password)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::EmailAlreadyRegistered
                } else {
                    e.into()
                }
            })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(user_repo::find_by_email(&self.pool, email).await?)
    }

    async fn create_post(&self, owner_id: i64, title: &str, content: &str) -> Result<Post> {
        post_repo::create_post(&self.pool, owner_id, title, content)
            .await
            .map_err(missing_reference)
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<Post>> {
        Ok(post_repo::find_post_by_id(&self.pool, post_id).await?)
    }

    async fn list_posts(&self, skip: i64, limit: i64) -> Result<Vec<Post>> {
        Ok(post_repo::list_posts(&self.pool, skip, limit).await?)
    }

    async fn update_post(
        &self,
        post_id: i64,
        owner_id: i64,
        title: &str,
        content: &str,
    ) -> Result<Option<Post>> {
        Ok(post_repo::update_post(&self.pool, post_id, owner_id, title, content).await?)
    }

    async fn delete_post(&self, post_id: i64, owner_id: i64) -> Result<bool> {
        Ok(post_repo::delete_post(&self.pool, post_id, owner_id).await?)
    }

    async fn toggle_like(&self, user_id: i64, post_id: i64) -> Result<LikeStatus> {
        let mut tx = self.pool.begin().await?;

        if !post_repo::lock_post(&mut *tx, post_id).await? {
            return Err(AppError::PostNotFound);
        }
        if !user_repo::lock_user(&mut *tx, user_id).await? {
            return Err(AppError::Unauthenticated);
        }

        let liked = if like_repo::delete_like(&mut *tx, user_id, post_id).await? {
            false
        } else if like_repo::insert_like(&mut *tx, user_id, post_id).await? {
            true
        } else {
            // Someone else's transaction committed this pair's like first;
            // treat it as already liked and remove it.
            debug!(user_id, post_id, "Like insert lost race, toggling off");
            like_repo::delete_like(&mut *tx, user_id, post_id).await?;
            false
        };

        let likes = like_repo::count_likes_by_post(&mut *tx, post_id).await?;
        tx.commit().await?;

        Ok(LikeStatus { likes, liked })
    }

    async fn count_likes(&self, post_id: i64) -> Result<i64> {
        Ok(like_repo::count_likes_by_post(&self.pool, post_id).await?)
    }

    async fn has_liked(&self, user_id: i64, post_id: i64) -> Result<bool> {
        Ok(like_repo::exists(&self.pool, user_id, post_id).await?)
    }

    async fn create_comment(&self, user_id: i64, post_id: i64, content: &str) -> Result<Comment> {
        comment_repo::create_comment(&self.pool, user_id, post_id, content)
            .await
            .map_err(missing_reference)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        Ok(comment_repo::list_by_post(&self.pool, post_id).await?)
    }

    async fn ping(&self) -> Result<()> {
        Ok(db_pool::ping(&self.pool).await?)
    }
}
