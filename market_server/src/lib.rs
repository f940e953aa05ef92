//! # Marketplace server
//! This crate hosts the REST surface of the marketplace. It is responsible for:
//! * account routes: registration, login, logout, profile and address updates;
//! * the public catalog routes and the partner price-list upload;
//! * basket routes and the checkout route that turns a basket into an order;
//! * wiring the engine's order events to the SMTP mailer.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Authentication
//! Clients authenticate with an opaque access token issued at login, presented in the `Authorization` header as
//! `Token <hex>` (or `Bearer <hex>`). Routes under `/api` sit behind the token middleware; a handful of routes
//! additionally require a role (see [`mod@middleware`]).

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod mailer;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
