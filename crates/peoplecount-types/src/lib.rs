//! Peoplecount Types - Shared token types
//!
//! This crate contains the value types passed between the auth core,
//! the axum integration and the HTTP service:
//! - Token kinds and identifiers
//! - Millisecond timestamps
//! - Issued token descriptors

pub mod time;
pub mod token;

pub use time::*;
pub use token::*;
