//! Catalog queries and the partner price-list workflow.

use std::fmt::Debug;

use log::*;

use crate::{
    api::catalog_objects::ProductDetail,
    db_types::Product,
    helpers::price_list::{PriceList, PriceListSummary},
    traits::{CatalogApiError, CatalogManagement},
};

pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// The public product listing. Only products of shops that are accepting orders are included.
    pub async fn products(&self) -> Result<Vec<Product>, CatalogApiError> {
        self.db.fetch_products_for_sale().await
    }

    /// The detailed product view, including extra parameters. `None` for unknown ids.
    pub async fn product_detail(&self, product_id: i64) -> Result<Option<ProductDetail>, CatalogApiError> {
        let product = match self.db.fetch_product(product_id).await? {
            Some(product) => product,
            None => return Ok(None),
        };
        let extra_parameters = self.db.fetch_extra_parameters(product_id).await?;
        Ok(Some(ProductDetail { product, extra_parameters }))
    }

    /// Parses and applies a raw price-list upload on behalf of a shop.
    pub async fn process_price_list(&self, shop_id: i64, data: &[u8]) -> Result<PriceListSummary, CatalogApiError> {
        let price_list = PriceList::parse(data).map_err(|e| {
            warn!("🏷️ Rejecting price list for shop #{shop_id}: {e}");
            CatalogApiError::InvalidDocument(e.to_string())
        })?;
        let summary = self.db.upsert_price_list(shop_id, &price_list).await?;
        info!(
            "🏷️ Price list applied for shop #{shop_id}: {} categories, {} products, {} parameters",
            summary.categories, summary.products, summary.parameters
        );
        Ok(summary)
    }
}
