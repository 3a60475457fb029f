use crate::db::Store;
use crate::error::Result;
use crate::models::{Comment, CommentInput, User};
use std::sync::Arc;
use tracing::info;

pub struct CommentService {
    store: Arc<dyn Store>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Any authenticated user may comment on an existing post.
    pub async fn add_comment(&self, author: &User, post_id: i64, input: CommentInput) -> Result<Comment> {
        let comment = self
            .store
            .create_comment(author.id, post_id, &input.content)
            .await?;

        info!(comment_id = comment.id, post_id, user_id = author.id, "Comment created");
        Ok(comment)
    }

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.store.list_comments(post_id).await
    }
}
