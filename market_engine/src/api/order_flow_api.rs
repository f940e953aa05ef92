//! Basket manipulation and the checkout workflow.

use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{BasketItem, Order, User},
    events::{EventProducers, OrderConfirmationEvent, SupplierNoticeEvent},
    order_objects::{BasketLine, CheckoutSummary, OrderDetail},
    traits::{OrderApiError, OrderManagement},
};

/// `OrderFlowApi` is the primary API for basket handling and for converting baskets into orders.
///
/// Checkout publishes the order-confirmation and supplier-notice events through the configured producers once the
/// database transaction has committed; event delivery never makes a committed checkout fail.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Adds a product to the user's basket, creating the basket on first use.
    pub async fn add_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<BasketItem, OrderApiError> {
        if quantity < 1 {
            return Err(OrderApiError::InvalidQuantity);
        }
        let item = self.db.add_basket_item(user_id, product_id, quantity).await?;
        debug!("🧺️ User #{user_id} put {quantity} × product #{product_id} in their basket");
        Ok(item)
    }

    /// Sets the quantity of one of the user's basket lines.
    pub async fn update_item(&self, user_id: i64, item_id: i64, quantity: i64) -> Result<BasketItem, OrderApiError> {
        if quantity < 1 {
            return Err(OrderApiError::InvalidQuantity);
        }
        self.db.update_basket_item(user_id, item_id, quantity).await
    }

    /// Removes one of the user's basket lines.
    pub async fn remove_item(&self, user_id: i64, item_id: i64) -> Result<(), OrderApiError> {
        self.db.remove_basket_item(user_id, item_id).await
    }

    /// The user's basket contents with product details and per-line totals.
    pub async fn basket(&self, user_id: i64) -> Result<Vec<BasketLine>, OrderApiError> {
        self.db.fetch_basket(user_id).await
    }

    /// Converts the user's basket into an order.
    ///
    /// The delivery address is the one supplied with the request, falling back to the address on the profile. The
    /// basket must not be empty. On success the basket is left empty and the two notification events are published.
    pub async fn checkout(&self, user: &User, delivery_address: Option<String>) -> Result<CheckoutSummary, OrderApiError> {
        let address = delivery_address
            .filter(|a| !a.trim().is_empty())
            .or_else(|| user.address.clone().filter(|a| !a.trim().is_empty()))
            .ok_or(OrderApiError::AddressRequired)?;
        let summary = self.db.checkout_basket(user.id, &address).await?;
        debug!(
            "🔄️📦️ Order #{} created for {}: {} lines, total {}",
            summary.order.id,
            user.email,
            summary.lines.len(),
            summary.order.total_price
        );
        self.publish_order_events(&summary, &user.email).await;
        Ok(summary)
    }

    async fn publish_order_events(&self, summary: &CheckoutSummary, customer_email: &str) {
        for producer in &self.producers.order_confirmation_producer {
            debug!("🔄️📦️ Notifying order confirmation subscribers for order #{}", summary.order.id);
            let event = OrderConfirmationEvent {
                order: summary.order.clone(),
                lines: summary.lines.clone(),
                email: customer_email.to_string(),
            };
            producer.publish_event(event).await;
        }
        if summary.suppliers.is_empty() {
            return;
        }
        for producer in &self.producers.supplier_notice_producer {
            debug!("🔄️📦️ Notifying supplier subscribers for order #{}", summary.order.id);
            let event =
                SupplierNoticeEvent { order_id: summary.order.id, notices: summary.suppliers.clone() };
            producer.publish_event(event).await;
        }
    }

    /// The user's order history, newest first.
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderApiError> {
        self.db.fetch_orders_for_user(user_id).await
    }

    /// One order with its lines. Ownership checks are the caller's concern.
    pub async fn order_detail(&self, order_id: i64) -> Result<Option<OrderDetail>, OrderApiError> {
        let detail = self.db.fetch_order(order_id).await?.map(|(order, items)| OrderDetail { order, items });
        Ok(detail)
    }

    /// Every order on the system, newest first.
    pub async fn all_orders(&self) -> Result<Vec<Order>, OrderApiError> {
        self.db.fetch_all_orders().await
    }
}
