//! SQLite operations on shop records.

use sqlx::SqliteConnection;

use crate::db_types::{NewShop, Shop};

pub async fn insert_shop(shop: NewShop, conn: &mut SqliteConnection) -> Result<Shop, sqlx::Error> {
    sqlx::query_as::<_, Shop>(r#"INSERT INTO shops (name, url) VALUES ($1, $2) RETURNING *"#)
        .bind(&shop.name)
        .bind(&shop.url)
        .fetch_one(conn)
        .await
}

pub async fn fetch_shop(shop_id: i64, conn: &mut SqliteConnection) -> Result<Option<Shop>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM shops WHERE id = $1").bind(shop_id).fetch_optional(conn).await
}
