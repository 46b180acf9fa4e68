//! Axum extractors for authenticated handlers.
//!
//! # Usage
//!
//! ```ignore
//! use peoplecount_axum::RequireAuth;
//!
//! async fn protected(auth: RequireAuth) -> String {
//!     format!("Hello {}", auth.subject)
//! }
//! ```

use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use peoplecount_auth_core::AuthError;

use crate::context::AuthContext;
use crate::error::AuthRejection;

/// Extractor that requires an admitted request.
///
/// Reads the [`AuthContext`] placed by [`crate::AdmissionLayer`]. On a route
/// without the layer it rejects with 401.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

impl Deref for RequireAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Self)
            .ok_or(AuthRejection(AuthError::MissingToken))
    }
}
