//! SQLite operations on user records.

use log::debug;
use sqlx::{FromRow, Row, SqliteConnection};

use crate::{
    db_types::{NewUser, Role, User},
    traits::AccountApiError,
};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, AccountApiError> {
    let result = sqlx::query_as::<_, User>(
        r#"INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING *"#,
    )
    .bind(&user.email)
    .bind(&user.password_hash)
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => {
            debug!("🗃️ User [{}] inserted with id {}", user.email, user.id);
            Ok(user)
        },
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => Err(AccountApiError::EmailAlreadyExists),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_user_by_id(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await
}

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await
}

/// Returns the user and their stored password hash. The hash never travels in a [`User`].
pub async fn fetch_credentials(
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<(User, String)>, AccountApiError> {
    let row = sqlx::query("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    match row {
        Some(row) => {
            let user = User::from_row(&row)?;
            let hash = row.try_get::<String, _>("password_hash")?;
            Ok(Some((user, hash)))
        },
        None => Ok(None),
    }
}

pub async fn update_address(
    user_id: i64,
    address: &str,
    conn: &mut SqliteConnection,
) -> Result<User, AccountApiError> {
    sqlx::query_as::<_, User>(
        r#"UPDATE users SET address = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *"#,
    )
    .bind(user_id)
    .bind(address)
    .fetch_optional(conn)
    .await?
    .ok_or(AccountApiError::UserNotFound)
}

/// Links the user to their shop and grants the corresponding role.
pub async fn assign_shop(
    user_id: i64,
    shop_id: i64,
    conn: &mut SqliteConnection,
) -> Result<User, AccountApiError> {
    sqlx::query_as::<_, User>(
        r#"UPDATE users SET shop_id = $2, role = $3, updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *"#,
    )
    .bind(user_id)
    .bind(shop_id)
    .bind(Role::Shop)
    .fetch_optional(conn)
    .await?
    .ok_or(AccountApiError::UserNotFound)
}
