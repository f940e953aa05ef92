//! SQLite database module for the marketplace engine.

mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
