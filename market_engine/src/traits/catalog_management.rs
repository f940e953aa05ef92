use thiserror::Error;

use crate::{
    db_types::{ExtraParameter, Product},
    helpers::price_list::{PriceList, PriceListSummary},
};

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Product {0} not found")]
    ProductNotFound(i64),
    #[error("Product {product_id} belongs to another shop")]
    ForeignProduct { product_id: i64 },
    #[error("Invalid YAML file")]
    InvalidDocument(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}

/// The `CatalogManagement` trait defines behaviour for the product catalog.
///
/// The read side serves the public product listing (restricted to shops that are accepting orders) and the detailed
/// product view. The write side is the partner price-list upload: a parsed [`PriceList`] is upserted on behalf of a
/// shop in a single transaction.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches all products belonging to shops that are currently accepting orders.
    async fn fetch_products_for_sale(&self) -> Result<Vec<Product>, CatalogApiError>;

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError>;

    async fn fetch_extra_parameters(&self, product_id: i64) -> Result<Vec<ExtraParameter>, CatalogApiError>;

    /// Applies a price list on behalf of `shop_id`, atomically:
    /// * categories upsert by id;
    /// * goods upsert by id, owned by `shop_id` — touching another shop's product aborts the whole upload with
    ///   [`CatalogApiError::ForeignProduct`];
    /// * each uploaded product's extra parameters are replaced with the supplied set.
    async fn upsert_price_list(&self, shop_id: i64, price_list: &PriceList)
        -> Result<PriceListSummary, CatalogApiError>;
}
