//! Authentication handlers (login, refresh, logout)

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use peoplecount_auth_core::{AuthError, LogoutOutcome};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extractors::BearerToken;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub refresh_expires_in: u64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
///
/// Exchange a username/password for an access and a refresh token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state.gateway.login(&req.username, &req.password).await?;
    let tokens = outcome.tokens;

    tracing::info!(subject = %outcome.subject, "Login succeeded");

    Ok(Json(LoginResponse {
        expires_in: tokens.access.expires_in_secs(),
        refresh_expires_in: tokens.refresh.expires_in_secs(),
        access_token: tokens.access.token,
        refresh_token: tokens.refresh.token,
        token_type: "Bearer",
        user: UserInfo {
            username: outcome.subject,
        },
    }))
}

/// POST /refresh
///
/// Takes the refresh token as `{"token": ...}` or as a bearer header and
/// returns a new access token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<RefreshResponse>> {
    let token = refresh_token_from(&headers, &body)?;
    let issued = state.gateway.refresh(&token)?;

    Ok(Json(RefreshResponse {
        expires_in: issued.expires_in_secs(),
        access_token: issued.token,
        token_type: "Bearer",
    }))
}

fn refresh_token_from(headers: &HeaderMap, body: &[u8]) -> ApiResult<String> {
    if !body.iter().all(u8::is_ascii_whitespace) {
        let req: RefreshRequest = serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("invalid refresh request: {e}")))?;
        return Ok(req.token);
    }

    peoplecount_axum::bearer_token(headers)
        .map(str::to_string)
        .ok_or(ApiError::Auth(AuthError::MissingToken))
}

/// POST /logout
///
/// Revoke the presented access or refresh token
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<LogoutResponse>> {
    match state.gateway.logout(&token)? {
        LogoutOutcome::Revoked => tracing::info!("Logout revoked token"),
        LogoutOutcome::AlreadyRevoked | LogoutOutcome::AlreadyExpired => {}
    }

    Ok(Json(LogoutResponse { success: true }))
}
