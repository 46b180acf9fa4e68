//! Peoplecount Auth Core - Token lifecycle business logic
//!
//! Issues, verifies and revokes the access/refresh tokens that guard the
//! store, camera and user API, and lets an operator re-key token lifetimes
//! at runtime without restarting the service.

pub mod admin;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod crypto;
pub mod error;
pub mod gateway;
pub mod metrics;
pub mod policy;
pub mod revocation;
pub mod token;

pub use admin::{AdminAuthorizer, AdminCredentials, BasicAdminAuthorizer};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AuthConfig;
pub use credentials::{hash_password, CredentialVerifier, StaticCredentialVerifier};
pub use crypto::{constant_time_eq, fingerprint, SigningKey, SigningKeyError};
pub use error::*;
pub use gateway::{Admission, AuthGateway, LoginOutcome, LogoutOutcome};
pub use policy::{Lifetimes, PolicyStore, PolicyUpdate};
pub use revocation::RevocationRegistry;
pub use token::{TokenClaims, TokenCodec};
