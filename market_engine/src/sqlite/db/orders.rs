//! SQLite operations on orders and order lines.

use log::debug;
use market_common::Money;
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{Order, OrderItem},
    order_objects::{OrderLine, SupplierNotice},
};

/// Inserts a new order in its initial state. The total is written once the lines have been snapshotted.
pub async fn insert_order(
    user_id: i64,
    delivery_address: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let order: Order =
        sqlx::query_as(r#"INSERT INTO orders (user_id, delivery_address) VALUES ($1, $2) RETURNING *"#)
            .bind(user_id)
            .bind(delivery_address)
            .fetch_one(conn)
            .await?;
    debug!("🗃️ Order #{} has been saved in the DB for user #{user_id}", order.id);
    Ok(order)
}

pub async fn insert_order_item(
    order_id: i64,
    product_id: i64,
    quantity: i64,
    unit_price: Money,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, sqlx::Error> {
    sqlx::query_as(
        r#"INSERT INTO order_items (order_id, product_id, quantity, unit_price)
           VALUES ($1, $2, $3, $4) RETURNING *"#,
    )
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .fetch_one(conn)
    .await
}

pub async fn set_order_total(
    order_id: i64,
    total: Money,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        r#"UPDATE orders SET total_price = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *"#,
    )
    .bind(order_id)
    .bind(total)
    .fetch_one(conn)
    .await
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await
}

pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await
}

pub async fn fetch_all_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC, id DESC").fetch_all(conn).await
}

#[derive(Debug, Clone, FromRow)]
struct OrderLineRow {
    product_id: i64,
    product_name: String,
    quantity: i64,
    unit_price: Money,
}

pub async fn fetch_order_lines(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderLine>, sqlx::Error> {
    let rows: Vec<OrderLineRow> = sqlx::query_as(
        r#"SELECT order_items.product_id, products.name AS product_name,
                  order_items.quantity, order_items.unit_price
           FROM order_items
           JOIN products ON products.id = order_items.product_id
           WHERE order_items.order_id = $1
           ORDER BY order_items.id"#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    let lines = rows
        .into_iter()
        .map(|r| OrderLine {
            product_id: r.product_id,
            product_name: r.product_name,
            quantity: r.quantity,
            unit_price: r.unit_price,
            total: r.unit_price * r.quantity,
        })
        .collect();
    Ok(lines)
}

#[derive(Debug, Clone, FromRow)]
struct SupplierRow {
    shop: String,
    email: String,
    product: String,
}

/// One entry per shop represented in the order, carrying the shop owner's email and the ordered product names.
pub async fn supplier_notices(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<SupplierNotice>, sqlx::Error> {
    let rows: Vec<SupplierRow> = sqlx::query_as(
        r#"SELECT shops.name AS shop, users.email AS email, products.name AS product
           FROM order_items
           JOIN products ON products.id = order_items.product_id
           JOIN shops ON shops.id = products.shop_id
           JOIN users ON users.shop_id = shops.id
           WHERE order_items.order_id = $1
           ORDER BY shops.name, products.name"#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    let mut notices: Vec<SupplierNotice> = Vec::new();
    for row in rows {
        match notices.iter_mut().find(|n| n.shop == row.shop && n.email == row.email) {
            Some(notice) => notice.products.push(row.product),
            None => notices.push(SupplierNotice { shop: row.shop, email: row.email, products: vec![row.product] }),
        }
    }
    Ok(notices)
}
