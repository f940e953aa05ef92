//! SQLite operations on baskets and basket lines.

use log::debug;
use market_common::Money;
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::BasketItem,
    order_objects::{BasketLine, ProductSummary},
};

/// A basket line joined with the slice of the product the basket views need.
#[derive(Debug, Clone, FromRow)]
struct BasketLineRow {
    id: i64,
    basket_id: i64,
    product_id: i64,
    product_name: String,
    price: Money,
    quantity: i64,
}

impl From<BasketLineRow> for BasketLine {
    fn from(row: BasketLineRow) -> Self {
        let total_price = row.price * row.quantity;
        BasketLine {
            id: row.id,
            basket_id: row.basket_id,
            product: ProductSummary { id: row.product_id, name: row.product_name, price: row.price },
            quantity: row.quantity,
            total_price,
        }
    }
}

pub async fn fetch_basket_id(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM baskets WHERE user_id = $1").bind(user_id).fetch_optional(conn).await
}

/// Returns the id of the user's basket, creating the basket if this is their first add.
pub async fn fetch_or_create_basket(user_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    if let Some(id) = fetch_basket_id(user_id, &mut *conn).await? {
        return Ok(id);
    }
    let id = sqlx::query_scalar("INSERT INTO baskets (user_id) VALUES ($1) RETURNING id")
        .bind(user_id)
        .fetch_one(conn)
        .await?;
    debug!("🧺️ Created basket #{id} for user #{user_id}");
    Ok(id)
}

/// Inserts a basket line, accumulating quantity when the product is already in the basket.
pub async fn upsert_item(
    basket_id: i64,
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<BasketItem, sqlx::Error> {
    sqlx::query_as(
        r#"INSERT INTO basket_items (basket_id, product_id, quantity) VALUES ($1, $2, $3)
           ON CONFLICT (basket_id, product_id)
           DO UPDATE SET quantity = quantity + excluded.quantity
           RETURNING *"#,
    )
    .bind(basket_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(conn)
    .await
}

/// Fetches a basket line only if it belongs to the given user's basket.
pub async fn fetch_item_for_user(
    item_id: i64,
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<BasketItem>, sqlx::Error> {
    sqlx::query_as(
        r#"SELECT basket_items.* FROM basket_items
           JOIN baskets ON baskets.id = basket_items.basket_id
           WHERE basket_items.id = $1 AND baskets.user_id = $2"#,
    )
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

pub async fn set_item_quantity(
    item_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<BasketItem, sqlx::Error> {
    sqlx::query_as("UPDATE basket_items SET quantity = $2 WHERE id = $1 RETURNING *")
        .bind(item_id)
        .bind(quantity)
        .fetch_one(conn)
        .await
}

pub async fn delete_item(item_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM basket_items WHERE id = $1").bind(item_id).execute(conn).await?;
    Ok(())
}

pub async fn fetch_basket_lines(
    basket_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<BasketLine>, sqlx::Error> {
    let rows: Vec<BasketLineRow> = sqlx::query_as(
        r#"SELECT basket_items.id, basket_items.basket_id, basket_items.product_id,
                  products.name AS product_name, products.price, basket_items.quantity
           FROM basket_items
           JOIN products ON products.id = basket_items.product_id
           WHERE basket_items.basket_id = $1
           ORDER BY basket_items.id"#,
    )
    .bind(basket_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(BasketLine::from).collect())
}

/// Deletes every line in the basket and returns how many there were.
pub async fn clear_basket(basket_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM basket_items WHERE basket_id = $1").bind(basket_id).execute(conn).await?;
    Ok(result.rows_affected())
}
