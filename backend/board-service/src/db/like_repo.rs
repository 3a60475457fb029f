use sqlx::PgExecutor;

/// Insert a like unless one already exists for the pair.
/// Returns `false` when the unique constraint absorbed the insert.
pub async fn insert_like<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    post_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO likes (user_id, post_id)
        VALUES ($1, $2)
        ON CONFLICT ON CONSTRAINT unique_user_post_like DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a user's like. Returns `true` if a row was removed.
pub async fn delete_like<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    post_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
        .bind(user_id)
        .bind(post_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count total likes for a post
pub async fn count_likes_by_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: i64,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Check if a user has liked a post
pub async fn exists<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    post_id: i64,
) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND post_id = $2)",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}
