use crate::{
    db_types::Order,
    order_objects::{OrderLine, SupplierNotice},
};

/// Published when a basket has been converted into an order. Subscribers typically send the buyer a confirmation
/// message.
#[derive(Debug, Clone)]
pub struct OrderConfirmationEvent {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    /// The buyer's email address.
    pub email: String,
}

/// Published alongside [`OrderConfirmationEvent`] with one entry per shop that has products in the order.
#[derive(Debug, Clone)]
pub struct SupplierNoticeEvent {
    pub order_id: i64,
    pub notices: Vec<SupplierNotice>,
}
