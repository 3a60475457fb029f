use crate::db::Store;
use crate::error::Result;
use crate::metrics;
use crate::models::{LikeStatus, User};
use std::sync::Arc;
use tracing::info;

/// Idempotent like toggling on top of the store's one-like-per-pair rule.
pub struct LikeService {
    store: Arc<dyn Store>,
}

impl LikeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn toggle(&self, actor: &User, post_id: i64) -> Result<LikeStatus> {
        let status = self.store.toggle_like(actor.id, post_id).await?;

        metrics::record_like_toggle(status.liked);
        info!(post_id, user_id = actor.id, liked = status.liked, likes = status.likes, "Like toggled");
        Ok(status)
    }

    /// Unknown posts simply have zero likes.
    pub async fn count(&self, post_id: i64) -> Result<i64> {
        self.store.count_likes(post_id).await
    }

    pub async fn status(&self, actor: &User, post_id: i64) -> Result<bool> {
        self.store.has_liked(actor.id, post_id).await
    }
}
