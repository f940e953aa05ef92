//! Unifies API for accessing user accounts and their shops.

use std::fmt::Debug;

use crate::{
    api::account_objects::Profile,
    db_types::{NewShop, Shop, User},
    traits::{AccountApiError, UserManagement},
};

/// The `AccountApi` provides a unified API for accessing user accounts.
pub struct AccountApi<B> {
    db: B,
}

impl<B> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi")
    }
}

impl<B> AccountApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the profile for the given user id, embedding the owned shop when there is one.
    pub async fn profile(&self, user_id: i64) -> Result<Option<Profile>, AccountApiError> {
        let user = match self.db.fetch_user_by_id(user_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };
        let shop = match user.shop_id {
            Some(shop_id) => self.db.fetch_shop(shop_id).await?,
            None => None,
        };
        Ok(Some(Profile::new(user, shop)))
    }

    /// Replaces the delivery address on the profile.
    pub async fn update_address(&self, user_id: i64, address: &str) -> Result<User, AccountApiError> {
        self.db.update_address(user_id, address).await
    }

    /// Upgrades the user to a partner: creates the shop and grants the `Shop` role.
    pub async fn register_partner(&self, user_id: i64, shop: NewShop) -> Result<Shop, AccountApiError> {
        self.db.create_shop_for_user(user_id, shop).await
    }
}
