//! Response shapes for catalog queries.

use serde::{Deserialize, Serialize};

use crate::db_types::{ExtraParameter, Product};

/// The detailed product view: the product row plus its extra parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub extra_parameters: Vec<ExtraParameter>,
}
