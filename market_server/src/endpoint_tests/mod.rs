mod account;
mod auth;
mod basket;
mod helpers;
mod mocks;
mod orders;
