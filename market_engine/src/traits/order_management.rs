use thiserror::Error;

use crate::{
    db_types::{BasketItem, Order},
    order_objects::{BasketLine, CheckoutSummary, OrderLine},
};

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Product {0} not found")]
    ProductNotFound(i64),
    #[error("Basket item {0} not found")]
    BasketItemNotFound(i64),
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("The basket is empty")]
    EmptyBasket,
    #[error("No delivery address provided and none is stored on the profile")]
    AddressRequired,
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        OrderApiError::DatabaseError(e.to_string())
    }
}

/// The `OrderManagement` trait defines behaviour for baskets and orders.
///
/// Basket rows are transient per-user working state; the checkout workflow converts them into append-only order
/// records. Implementations must make [`OrderManagement::checkout_basket`] atomic: the order, its line snapshots,
/// the computed total and the basket purge either all commit or none do.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Adds a product to the user's basket, creating the basket on first use. Adding a product that is already in
    /// the basket accumulates the quantity on the existing line.
    async fn add_basket_item(&self, user_id: i64, product_id: i64, quantity: i64)
        -> Result<BasketItem, OrderApiError>;

    /// Sets the quantity of one basket line. The line must belong to the user's own basket.
    async fn update_basket_item(&self, user_id: i64, item_id: i64, quantity: i64)
        -> Result<BasketItem, OrderApiError>;

    /// Removes one basket line. The line must belong to the user's own basket.
    async fn remove_basket_item(&self, user_id: i64, item_id: i64) -> Result<(), OrderApiError>;

    /// Fetches the user's basket contents with product details and per-line totals. An absent basket reads as empty.
    async fn fetch_basket(&self, user_id: i64) -> Result<Vec<BasketLine>, OrderApiError>;

    /// Converts the user's basket into an order, atomically: creates the order, snapshots every basket line
    /// (quantity and unit price), stores the computed total and clears the basket. Returns the order together with
    /// its lines and the per-shop supplier summary needed for notifications.
    async fn checkout_basket(&self, user_id: i64, delivery_address: &str)
        -> Result<CheckoutSummary, OrderApiError>;

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderApiError>;

    /// Fetches one order with its lines, regardless of owner. Ownership checks are the caller's concern.
    async fn fetch_order(&self, order_id: i64) -> Result<Option<(Order, Vec<OrderLine>)>, OrderApiError>;

    /// Fetches every order on the system, newest first.
    async fn fetch_all_orders(&self) -> Result<Vec<Order>, OrderApiError>;
}
