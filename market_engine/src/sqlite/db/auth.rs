//! SQLite operations for access tokens.
//!
//! Generally clients should never call these methods directly, and prefer the [`crate::traits::AuthManagement`]
//! methods implemented on [`crate::SqliteDatabase`] instead.

use sqlx::SqliteConnection;

use crate::{db_types::User, traits::AuthApiError};

pub async fn insert_token(
    user_id: i64,
    token_digest: &str,
    conn: &mut SqliteConnection,
) -> Result<(), AuthApiError> {
    sqlx::query("INSERT INTO access_tokens (token_digest, user_id) VALUES ($1, $2)")
        .bind(token_digest)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_user_by_token(
    token_digest: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, AuthApiError> {
    let user = sqlx::query_as(
        r#"SELECT users.* FROM users
           JOIN access_tokens ON access_tokens.user_id = users.id
           WHERE access_tokens.token_digest = $1"#,
    )
    .bind(token_digest)
    .fetch_optional(conn)
    .await?;
    Ok(user)
}

/// Returns `true` when a token was actually deleted.
pub async fn delete_token(token_digest: &str, conn: &mut SqliteConnection) -> Result<bool, AuthApiError> {
    let result =
        sqlx::query("DELETE FROM access_tokens WHERE token_digest = $1").bind(token_digest).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
