use crate::models::Comment;
use sqlx::PgExecutor;

/// Create a new comment on a post
pub async fn create_comment<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    post_id: i64,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (content, user_id, post_id)
        VALUES ($1, $2, $3)
        RETURNING id, content, user_id, post_id
        "#,
    )
    .bind(content)
    .bind(user_id)
    .bind(post_id)
    .fetch_one(executor)
    .await
}

/// Get comments for a post in insertion order
pub async fn list_by_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, content, user_id, post_id
        FROM comments
        WHERE post_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(executor)
    .await
}
