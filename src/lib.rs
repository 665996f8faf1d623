pub mod auction;
pub mod auth;
pub mod bidding;
pub mod clock;
pub mod config;
pub mod database;
pub mod handlers;
pub mod listings;
pub mod query;
pub mod store;
pub mod view;
