use thiserror::Error;

use crate::db_types::User;

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("This password is too short. It must contain at least 8 characters")]
    PasswordTooShort,
    #[error("A user with this email already exists")]
    EmailAlreadyExists,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Access token not recognised")]
    TokenNotFound,
    #[error("Could not hash the password: {0}")]
    PasswordHash(String),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}

/// The `AuthManagement` trait defines behaviour for managing access tokens.
///
/// Tokens are opaque random strings handed to clients at login. Only the SHA-256 digest of a token is ever stored;
/// implementations look tokens up by digest and never see the plaintext.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Records a token digest for the given user.
    async fn store_token(&self, user_id: i64, token_digest: &str) -> Result<(), AuthApiError>;

    /// Resolves a token digest to its user. Fails with [`AuthApiError::TokenNotFound`] for unknown digests.
    async fn fetch_user_by_token(&self, token_digest: &str) -> Result<User, AuthApiError>;

    /// Deletes the token digest. Fails with [`AuthApiError::TokenNotFound`] when it was not stored.
    async fn revoke_token(&self, token_digest: &str) -> Result<(), AuthApiError>;
}
