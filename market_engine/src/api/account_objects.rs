//! Response shapes for account queries.

use serde::{Deserialize, Serialize};

use crate::db_types::{Role, Shop, User};

/// A user profile as served by the account endpoint. The owned shop, if any, is embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub address: Option<String>,
    pub role: Role,
    pub shop: Option<Shop>,
}

impl Profile {
    pub fn new(user: User, shop: Option<Shop>) -> Self {
        Self { id: user.id, email: user.email, address: user.address, role: user.role, shop }
    }
}
