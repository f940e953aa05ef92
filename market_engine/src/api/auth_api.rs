//! Registration, login and token authentication.

use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewUser, User},
    helpers::{
        access_tokens::{generate_token, token_digest},
        passwords::{hash_password, validate_email, validate_password, verify_password},
    },
    traits::{AccountApiError, AuthApiError, AuthManagement, UserManagement},
};

/// The `AuthApi` carries the credential workflows: registration, login (which mints an access token), token
/// authentication and logout.
pub struct AuthApi<B> {
    db: B,
}

impl<B> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi")
    }
}

impl<B> AuthApi<B>
where B: UserManagement + AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a new customer account. The email must look like an email, the password must meet the minimum
    /// length, and the email must not be taken.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthApiError> {
        let email = email.trim().to_ascii_lowercase();
        validate_email(&email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;
        let user = self.db.create_user(NewUser { email, password_hash }).await.map_err(|e| match e {
            AccountApiError::EmailAlreadyExists => AuthApiError::EmailAlreadyExists,
            other => AuthApiError::DatabaseError(other.to_string()),
        })?;
        info!("🔑️ New account registered for {}", user.email);
        Ok(user)
    }

    /// Checks the credentials and issues a fresh access token. The plaintext token is returned exactly once; only
    /// its digest is stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthApiError> {
        let email = email.trim().to_ascii_lowercase();
        let (user, stored_hash) = self
            .db
            .fetch_credentials(&email)
            .await
            .map_err(|e| AuthApiError::DatabaseError(e.to_string()))?
            .ok_or(AuthApiError::InvalidCredentials)?;
        verify_password(password, &stored_hash)?;
        let token = generate_token();
        self.db.store_token(user.id, &token_digest(&token)).await?;
        debug!("🔑️ Issued access token for {}", user.email);
        Ok((user, token))
    }

    /// Resolves a presented token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthApiError> {
        self.db.fetch_user_by_token(&token_digest(token)).await
    }

    /// Revokes the presented token. Subsequent requests carrying it will be rejected.
    pub async fn logout(&self, token: &str) -> Result<(), AuthApiError> {
        self.db.revoke_token(&token_digest(token)).await
    }
}
