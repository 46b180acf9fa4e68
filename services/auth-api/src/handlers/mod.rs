//! HTTP handlers

mod admin;
mod auth;
mod health;
mod protected;

pub use admin::set_token_expiry;
pub use auth::{login, logout, refresh};
pub use health::{health, index, ready};
pub use protected::protected;
