//! # Database management and control.
//!
//! This module defines the interface contracts that storage *backends* of the marketplace engine must satisfy.
//!
//! * [`UserManagement`] covers user accounts: registration records, profile lookups, address updates and the
//!   customer-to-partner upgrade.
//! * [`AuthManagement`] covers access tokens: storing token digests, resolving a digest back to its user, and
//!   revocation.
//! * [`CatalogManagement`] covers the public catalog and the partner price-list ingestion workflow.
//! * [`OrderManagement`] covers baskets and the checkout workflow that turns a basket into an order.
//!
//! Backends implement these traits over their own connection handling; the SQLite backend composes the low-level
//! query functions in `sqlite::db` into transactions where a workflow demands atomicity.

mod account_management;
mod auth_management;
mod catalog_management;
mod order_management;

pub use account_management::{AccountApiError, UserManagement};
pub use auth_management::{AuthApiError, AuthManagement};
pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use order_management::{OrderApiError, OrderManagement};
