//! The partner price-list document.
//!
//! Partners push their catalog as a YAML document with two top-level collections: `categories` and `goods`. Each
//! good carries a free-form `parameters` map. The document is parsed here; applying it to the database is
//! [`crate::traits::CatalogManagement::upsert_price_list`].

use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PriceList {
    #[serde(default)]
    pub categories: Vec<PriceListCategory>,
    #[serde(default)]
    pub goods: Vec<PriceListGood>,
}

impl PriceList {
    /// Parses a raw upload. The document must be valid YAML with the expected field layout.
    pub fn parse(data: &[u8]) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_slice(data)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceListCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceListGood {
    pub id: i64,
    pub category: Option<i64>,
    pub model: Option<String>,
    pub name: String,
    /// Whole rubles, as partners quote them.
    pub price: i64,
    pub quantity: i64,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
}

/// Parameter values arrive as whatever scalar the partner wrote ("6.5", 512, true). They are stored as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterValue::Bool(v) => write!(f, "{v}"),
            ParameterValue::Int(v) => write!(f, "{v}"),
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Row counts written by a price-list upload. Returned to the uploader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListSummary {
    pub categories: usize,
    pub products: usize,
    pub parameters: usize,
}
