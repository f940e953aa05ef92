//! SQLite operations on the product catalog.

use log::trace;
use market_common::Money;
use sqlx::SqliteConnection;

use crate::{
    db_types::{ExtraParameter, Product},
    helpers::price_list::{PriceListCategory, PriceListGood},
};

/// Products of shops that are not accepting orders are excluded from the public listing.
pub async fn fetch_products_for_sale(conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        r#"SELECT products.* FROM products
           JOIN shops ON shops.id = products.shop_id
           WHERE shops.accepting_orders = 1
           ORDER BY products.id"#,
    )
    .fetch_all(conn)
    .await
}

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await
}

pub async fn fetch_extra_parameters(
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ExtraParameter>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM extra_parameters WHERE product_id = $1 ORDER BY name")
        .bind(product_id)
        .fetch_all(conn)
        .await
}

/// The shop currently owning the product, if the product exists at all.
pub async fn product_owner(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT shop_id FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await
}

pub async fn upsert_category(category: &PriceListCategory, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO product_categories (id, name) VALUES ($1, $2)
           ON CONFLICT (id) DO UPDATE SET name = excluded.name"#,
    )
    .bind(category.id)
    .bind(&category.name)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_product(
    good: &PriceListGood,
    shop_id: i64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    trace!("🗃️ Upserting product #{} for shop #{shop_id}", good.id);
    sqlx::query(
        r#"INSERT INTO products (id, name, model, price, quantity, category_id, shop_id)
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           ON CONFLICT (id) DO UPDATE SET
               name = excluded.name,
               model = excluded.model,
               price = excluded.price,
               quantity = excluded.quantity,
               category_id = excluded.category_id,
               updated_at = CURRENT_TIMESTAMP"#,
    )
    .bind(good.id)
    .bind(&good.name)
    .bind(&good.model)
    .bind(Money::from_rubles(good.price))
    .bind(good.quantity)
    .bind(good.category)
    .bind(shop_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Replaces the product's parameter set with the supplied one and returns the number of rows written.
pub async fn replace_extra_parameters(
    good: &PriceListGood,
    conn: &mut SqliteConnection,
) -> Result<usize, sqlx::Error> {
    sqlx::query("DELETE FROM extra_parameters WHERE product_id = $1").bind(good.id).execute(&mut *conn).await?;
    for (name, value) in &good.parameters {
        sqlx::query("INSERT INTO extra_parameters (product_id, name, value) VALUES ($1, $2, $3)")
            .bind(good.id)
            .bind(name)
            .bind(value.to_string())
            .execute(&mut *conn)
            .await?;
    }
    Ok(good.parameters.len())
}
