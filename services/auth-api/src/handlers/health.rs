//! Health check handlers

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub msg: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub checks: ReadyChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyChecks {
    pub token_state: TokenStateCheck,
}

#[derive(Debug, Serialize)]
pub struct TokenStateCheck {
    pub status: &'static str,
    pub access_token_expires_seconds: u64,
    pub refresh_token_expires_seconds: u64,
    pub revoked_tokens: usize,
}

/// GET / - Banner
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        msg: "API is running",
    })
}

/// GET /health - Liveness probe (fast, no dependencies)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "auth-api",
    })
}

/// GET /ready - Readiness probe (token state reachable)
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let lifetimes = state.gateway.lifetimes();

    Json(ReadyResponse {
        status: "ready",
        service: "auth-api",
        checks: ReadyChecks {
            token_state: TokenStateCheck {
                status: "ok",
                access_token_expires_seconds: lifetimes.access.as_secs(),
                refresh_token_expires_seconds: lifetimes.refresh.as_secs(),
                revoked_tokens: state.gateway.revoked_count(),
            },
        },
    })
}
