//! `SqliteDatabase` is a concrete implementation of a marketplace engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module. Workflows that must be atomic (partner uploads, checkout, the partner upgrade) run
//! inside a single transaction; everything else borrows a pooled connection.

use std::fmt::Debug;

use log::*;
use market_common::Money;
use sqlx::SqlitePool;

use super::db::{auth, baskets, catalog, new_pool, orders, shops, users};
use crate::{
    db_types::{BasketItem, ExtraParameter, NewShop, NewUser, Order, Product, Shop, User},
    helpers::price_list::{PriceList, PriceListSummary},
    order_objects::{BasketLine, CheckoutSummary, OrderLine},
    traits::{
        AccountApiError,
        AuthApiError,
        AuthManagement,
        CatalogApiError,
        CatalogManagement,
        OrderApiError,
        OrderManagement,
        UserManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl UserManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_id(user_id, &mut conn).await?)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_email(email, &mut conn).await?)
    }

    async fn fetch_credentials(&self, email: &str) -> Result<Option<(User, String)>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_credentials(email, &mut conn).await
    }

    async fn update_address(&self, user_id: i64, address: &str) -> Result<User, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::update_address(user_id, address, &mut conn).await
    }

    async fn create_shop_for_user(&self, user_id: i64, shop: NewShop) -> Result<Shop, AccountApiError> {
        let mut tx = self.pool.begin().await?;
        let user = users::fetch_user_by_id(user_id, &mut tx).await?.ok_or(AccountApiError::UserNotFound)?;
        if user.shop_id.is_some() {
            return Err(AccountApiError::ShopAlreadyExists);
        }
        let shop = shops::insert_shop(shop, &mut tx).await?;
        users::assign_shop(user_id, shop.id, &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ User #{user_id} is now a partner, running shop #{} ({})", shop.id, shop.name);
        Ok(shop)
    }

    async fn fetch_shop(&self, shop_id: i64) -> Result<Option<Shop>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(shops::fetch_shop(shop_id, &mut conn).await?)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn store_token(&self, user_id: i64, token_digest: &str) -> Result<(), AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        auth::insert_token(user_id, token_digest, &mut conn).await
    }

    async fn fetch_user_by_token(&self, token_digest: &str) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        auth::fetch_user_by_token(token_digest, &mut conn).await?.ok_or(AuthApiError::TokenNotFound)
    }

    async fn revoke_token(&self, token_digest: &str) -> Result<(), AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        if auth::delete_token(token_digest, &mut conn).await? {
            Ok(())
        } else {
            Err(AuthApiError::TokenNotFound)
        }
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_products_for_sale(&self) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_products_for_sale(&mut conn).await?)
    }

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_product(product_id, &mut conn).await?)
    }

    async fn fetch_extra_parameters(
        &self,
        product_id: i64,
    ) -> Result<Vec<ExtraParameter>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_extra_parameters(product_id, &mut conn).await?)
    }

    async fn upsert_price_list(
        &self,
        shop_id: i64,
        price_list: &PriceList,
    ) -> Result<PriceListSummary, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let mut summary = PriceListSummary::default();
        for category in &price_list.categories {
            catalog::upsert_category(category, &mut tx).await?;
            summary.categories += 1;
        }
        for good in &price_list.goods {
            // Aborting here rolls the whole upload back; a partial catalog is worse than a rejected one.
            if let Some(owner) = catalog::product_owner(good.id, &mut tx).await? {
                if owner != shop_id {
                    warn!("🗃️ Shop #{shop_id} tried to overwrite product #{} of shop #{owner}", good.id);
                    return Err(CatalogApiError::ForeignProduct { product_id: good.id });
                }
            }
            catalog::upsert_product(good, shop_id, &mut tx).await?;
            summary.parameters += catalog::replace_extra_parameters(good, &mut tx).await?;
            summary.products += 1;
        }
        tx.commit().await?;
        Ok(summary)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn add_basket_item(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<BasketItem, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        if catalog::fetch_product(product_id, &mut tx).await?.is_none() {
            return Err(OrderApiError::ProductNotFound(product_id));
        }
        let basket_id = baskets::fetch_or_create_basket(user_id, &mut tx).await?;
        let item = baskets::upsert_item(basket_id, product_id, quantity, &mut tx).await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn update_basket_item(
        &self,
        user_id: i64,
        item_id: i64,
        quantity: i64,
    ) -> Result<BasketItem, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        if baskets::fetch_item_for_user(item_id, user_id, &mut conn).await?.is_none() {
            return Err(OrderApiError::BasketItemNotFound(item_id));
        }
        Ok(baskets::set_item_quantity(item_id, quantity, &mut conn).await?)
    }

    async fn remove_basket_item(&self, user_id: i64, item_id: i64) -> Result<(), OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        if baskets::fetch_item_for_user(item_id, user_id, &mut conn).await?.is_none() {
            return Err(OrderApiError::BasketItemNotFound(item_id));
        }
        Ok(baskets::delete_item(item_id, &mut conn).await?)
    }

    async fn fetch_basket(&self, user_id: i64) -> Result<Vec<BasketLine>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        match baskets::fetch_basket_id(user_id, &mut conn).await? {
            Some(basket_id) => Ok(baskets::fetch_basket_lines(basket_id, &mut conn).await?),
            None => Ok(Vec::new()),
        }
    }

    /// The checkout transaction: snapshot every basket line into the order, store the computed total, empty the
    /// basket, and gather the per-shop supplier summary. Either all of it commits or none of it does.
    async fn checkout_basket(&self, user_id: i64, delivery_address: &str) -> Result<CheckoutSummary, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let basket_id =
            baskets::fetch_basket_id(user_id, &mut tx).await?.ok_or(OrderApiError::EmptyBasket)?;
        let basket_lines = baskets::fetch_basket_lines(basket_id, &mut tx).await?;
        if basket_lines.is_empty() {
            return Err(OrderApiError::EmptyBasket);
        }
        let order = orders::insert_order(user_id, delivery_address, &mut tx).await?;
        let mut total = Money::default();
        let mut lines = Vec::with_capacity(basket_lines.len());
        for line in &basket_lines {
            let item = orders::insert_order_item(
                order.id,
                line.product.id,
                line.quantity,
                line.product.price,
                &mut tx,
            )
            .await?;
            total += item.unit_price * item.quantity;
            lines.push(OrderLine {
                product_id: item.product_id,
                product_name: line.product.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: item.unit_price * item.quantity,
            });
        }
        let order = orders::set_order_total(order.id, total, &mut tx).await?;
        let cleared = baskets::clear_basket(basket_id, &mut tx).await?;
        let suppliers = orders::supplier_notices(order.id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Checkout of basket #{basket_id} cleared {cleared} lines into order #{}", order.id);
        Ok(CheckoutSummary { order, lines, suppliers })
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders_for_user(user_id, &mut conn).await?)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<(Order, Vec<OrderLine>)>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = match orders::fetch_order(order_id, &mut conn).await? {
            Some(order) => order,
            None => return Ok(None),
        };
        let lines = orders::fetch_order_lines(order_id, &mut conn).await?;
        Ok(Some((order, lines)))
    }

    async fn fetch_all_orders(&self) -> Result<Vec<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_all_orders(&mut conn).await?)
    }
}
