// opsdeck-api: Async Rust client for the opsdeck administration API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod auth;
mod projects;
mod promotions;
mod regions;
mod roles;
mod stores;
mod tickets;
mod users;

pub use client::ApiClient;
pub use error::Error;
