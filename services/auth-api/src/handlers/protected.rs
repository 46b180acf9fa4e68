//! Example protected route

use axum::Json;
use peoplecount_axum::RequireAuth;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub msg: String,
}

/// GET /protected - Requires an honored access token
pub async fn protected(auth: RequireAuth) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        msg: format!("Hello {}, access granted", auth.subject),
    })
}
