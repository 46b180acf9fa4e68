//! Peoplecount Auth API
//!
//! Token authentication gateway for the store, camera and user API.
//!
//! ## REST Endpoints
//!
//! - `POST /login` - Exchange username/password for access and refresh tokens
//! - `POST /refresh` - Exchange a refresh token for a new access token
//! - `POST /logout` - Revoke the presented token
//! - `GET /protected` - Example route behind the admission layer
//! - `POST /admin/set_token_expiry` - Change token lifetimes (HTTP Basic operator credential)
//!
//! ## Health Endpoints
//!
//! - `GET /` - Banner
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use peoplecount_auth_core::AuthGateway;
use peoplecount_axum::AdmissionLayer;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::state::AppState;

/// Build the HTTP router
pub fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // Routes behind token admission
    let protected = Router::new()
        .route("/protected", get(handlers::protected))
        .route_layer(AdmissionLayer::new(Arc::clone(&state.gateway)));

    let api = Router::new()
        .route("/", get(handlers::index))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/logout", post(handlers::logout))
        .route("/admin/set_token_expiry", post(handlers::set_token_expiry))
        .merge(protected);

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS for browser clients
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    Router::new()
        .merge(api)
        .layer(middleware)
        .merge(health_routes)
        .merge(metrics_route)
        .with_state(state)
}

/// Periodically drop revocation entries whose tokens have expired
pub fn spawn_revocation_compaction(gateway: Arc<AuthGateway>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let removed = gateway.compact_revocations();
            tracing::debug!(
                removed,
                remaining = gateway.revoked_count(),
                "Revocation compaction pass"
            );
        }
    })
}
