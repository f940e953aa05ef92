//! Response shapes for basket and order queries.

use market_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// The slice of a product that basket views expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: Money,
}

/// One basket line, joined with its product and priced out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    pub id: i64,
    #[serde(rename = "basket")]
    pub basket_id: i64,
    pub product: ProductSummary,
    pub quantity: i64,
    pub total_price: Money,
}

/// One line of a finalized order: quantity and unit price as they were at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
}

/// Everything the supplier notification needs about one shop's share of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierNotice {
    pub shop: String,
    pub email: String,
    pub products: Vec<String>,
}

/// The result of converting a basket into an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    pub suppliers: Vec<SupplierNotice>,
}

/// An order together with its lines, as served by the order-detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}
