use thiserror::Error;

use crate::db_types::{NewShop, NewUser, Shop, User};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A user with this email already exists")]
    EmailAlreadyExists,
    #[error("User account not found")]
    UserNotFound,
    #[error("The user already owns a shop")]
    ShopAlreadyExists,
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}

/// The `UserManagement` trait defines behaviour for managing user accounts and the shops attached to them.
///
/// Workflow-level validation (email format, password strength) lives in [`crate::AuthApi`] and
/// [`crate::AccountApi`]; implementations of this trait only enforce relational integrity.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Stores a new user record. Fails with [`AccountApiError::EmailAlreadyExists`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AccountApiError>;

    async fn fetch_user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;

    /// Fetches the user together with their stored password hash, for credential checks at login.
    async fn fetch_credentials(&self, email: &str) -> Result<Option<(User, String)>, AccountApiError>;

    /// Replaces the delivery address on the user's profile and returns the updated record.
    async fn update_address(&self, user_id: i64, address: &str) -> Result<User, AccountApiError>;

    /// Creates a shop owned by the given user and grants them the `Shop` role, atomically.
    ///
    /// Fails with [`AccountApiError::ShopAlreadyExists`] when the user already owns a shop.
    async fn create_shop_for_user(&self, user_id: i64, shop: NewShop) -> Result<Shop, AccountApiError>;

    async fn fetch_shop(&self, shop_id: i64) -> Result<Option<Shop>, AccountApiError>;
}
