use crate::models::User;
use sqlx::PgExecutor;

/// Insert a user; a taken email surfaces as a unique violation
pub async fn create_user<'e, E: PgExecutor<'e>>(
    executor: E,
    email: &str,
    hashed_password: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, hashed_password)
        VALUES ($1, $2)
        RETURNING id, email, hashed_password
        "#,
    )
    .bind(email)
    .bind(hashed_password)
    .fetch_one(executor)
    .await
}

pub async fn find_by_email<'e, E: PgExecutor<'e>>(
    executor: E,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, hashed_password
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

/// Row-lock the user until the transaction ends, serializing that user's
/// like toggles. `FOR NO KEY UPDATE` leaves foreign-key checks unblocked.
/// Returns `false` when the user does not exist.
pub async fn lock_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR NO KEY UPDATE")
            .bind(user_id)
            .fetch_optional(executor)
            .await?;

    Ok(row.is_some())
}
