//! Marketplace Engine
//!
//! The marketplace engine contains the storage layer and domain logic for the marketplace server. It is
//! framework-agnostic; the REST surface lives in the `market_server` crate.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@traits`] and the SQLite backend). You should never need to access the
//!    database directly. Instead, use the public API facades. The exception is the data types used in the database,
//!    which are defined in the `db_types` module and are public.
//! 2. The engine public API ([`AccountApi`], [`AuthApi`], [`CatalogApi`] and [`OrderFlowApi`]). These wrap a storage
//!    backend and carry the workflow logic: registration and login, catalog queries and price-list ingestion, basket
//!    manipulation and the checkout flow. Backends implement the traits in [`mod@traits`] to plug in.
//!
//! The engine also provides a set of events that fire when certain actions occur. When a basket is converted into an
//! order, an order-confirmation event and a supplier-notice event are emitted; subscribers (such as the server's
//! mailer) handle them asynchronously without blocking the checkout response.

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

mod api;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use api::{
    account_objects,
    accounts_api::AccountApi,
    auth_api::AuthApi,
    catalog_api::CatalogApi,
    catalog_objects,
    order_flow_api::OrderFlowApi,
    order_objects,
};
