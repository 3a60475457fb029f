use crate::models::Post;
use sqlx::PgExecutor;

/// Create a new post
pub async fn create_post<'e, E: PgExecutor<'e>>(
    executor: E,
    owner_id: i64,
    title: &str,
    content: &str,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (title, content, owner_id)
        VALUES ($1, $2, $3)
        RETURNING id, title, content, owner_id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(owner_id)
    .fetch_one(executor)
    .await
}

pub async fn find_post_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: i64,
) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, owner_id
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(executor)
    .await
}

/// Take a key-share lock on the post row for the rest of the transaction.
/// Returns `false` when the post does not exist.
pub async fn lock_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM posts WHERE id = $1 FOR KEY SHARE")
        .bind(post_id)
        .fetch_optional(executor)
        .await?;

    Ok(row.is_some())
}

/// Get posts newest first with pagination
pub async fn list_posts<'e, E: PgExecutor<'e>>(
    executor: E,
    offset: i64,
    limit: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, owner_id
        FROM posts
        ORDER BY id DESC
        OFFSET $1
        LIMIT $2
        "#,
    )
    .bind(offset)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Update title and content; scoped to the owner so ownership can't change
/// between the permission check and the write
pub async fn update_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: i64,
    owner_id: i64,
    title: &str,
    content: &str,
) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = $3, content = $4
        WHERE id = $1 AND owner_id = $2
        RETURNING id, title, content, owner_id
        "#,
    )
    .bind(post_id)
    .bind(owner_id)
    .bind(title)
    .bind(content)
    .fetch_optional(executor)
    .await
}

/// Delete a post; likes and comments go with it via ON DELETE CASCADE
pub async fn delete_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: i64,
    owner_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND owner_id = $2")
        .bind(post_id)
        .bind(owner_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
