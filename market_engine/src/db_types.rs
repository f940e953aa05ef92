//! Data types as they are stored in the database.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use market_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------        Role         ---------------------------------------------------------
/// The role attached to a user account. Every account has exactly one role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[default]
    Customer,
    /// A partner account. Shop users own a [`Shop`] record and may upload price lists.
    Shop,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Customer => write!(f, "Customer"),
            Role::Shop => write!(f, "Shop"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Customer" => Ok(Self::Customer),
            "Shop" => Ok(Self::Shop),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been placed and is awaiting fulfilment. Every order starts out in this state.
    Active,
    /// The order has been delivered.
    Completed,
    /// The order has been cancelled by the user or an admin.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Active => write!(f, "Active"),
            OrderStatusType::Completed => write!(f, "Completed"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------        User         ---------------------------------------------------------
/// A user account. The password hash is deliberately kept out of this struct; credential checks go through
/// [`crate::traits::UserManagement::fetch_credentials`].
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub address: Option<String>,
    pub role: Role,
    pub shop_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

//--------------------------------------        Shop         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    /// Products of shops that are not accepting orders are hidden from the public catalog.
    pub accepting_orders: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShop {
    pub name: String,
    pub url: Option<String>,
}

//--------------------------------------   ProductCategory   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: i64,
    pub name: String,
}

//--------------------------------------       Product       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub model: Option<String>,
    pub price: Money,
    /// Stock on hand, as reported by the owning shop's last price list.
    pub quantity: i64,
    pub category_id: Option<i64>,
    pub shop_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    ExtraParameter   ---------------------------------------------------------
/// A free-form name/value pair attached to a product ("Screen size": "6.5"). Unique per (product, name).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ExtraParameter {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub value: String,
}

//--------------------------------------      BasketItem     ---------------------------------------------------------
/// One line of a user's basket. Transient: the whole set is deleted when the basket is checked out.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct BasketItem {
    pub id: i64,
    pub basket_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

//--------------------------------------        Order        ---------------------------------------------------------
/// A finalized purchase. Order rows are append-only historical records.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatusType,
    pub delivery_address: String,
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      OrderItem      ---------------------------------------------------------
/// A line of a finalized order. Quantity and unit price are snapshots taken at checkout, so the order total stays
/// consistent when the catalog changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
}
