pub mod auth;
pub mod bot;
pub mod config;
pub mod error;
pub mod handlers;
pub mod store;
pub mod telegram;
pub mod types;
pub mod wishlist;

pub use config::Config;
pub use error::{Error, FieldError, Result};
