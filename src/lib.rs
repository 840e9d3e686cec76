pub mod auth;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod providers;
pub mod server;

pub use error::PrismError;
