//! Peoplecount Axum Integration
//!
//! Admission middleware and extractors that put the auth gateway in front of
//! axum routes.
//!
//! # Quick Start
//!
//! ```ignore
//! use peoplecount_axum::{AdmissionLayer, RequireAuth};
//! use axum::{Router, routing::get};
//!
//! async fn protected_handler(auth: RequireAuth) -> String {
//!     format!("Hello {}", auth.subject)
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .route_layer(AdmissionLayer::new(gateway));
//! ```
//!
//! Requests without an honored access token never reach the handler; they
//! are answered with the rejection's status and a JSON error body.

pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;

pub use context::AuthContext;
pub use error::{AuthRejection, ErrorBody, ErrorDetail};
pub use extractors::RequireAuth;
pub use layer::{bearer_token, AdmissionFuture, AdmissionLayer, AdmissionService};
