//! Peoplecount Auth API
//!
//! Run with no arguments to serve. `auth-api hash-password` reads a password
//! from stdin and prints its PHC hash for `AUTH_PASSWORD_HASH` or
//! `ADMIN_PASSWORD_HASH`.

use std::io::BufRead;
use std::net::SocketAddr;
use std::sync::Arc;

use auth_api::config::Config;
use auth_api::state::AppState;
use auth_api::{build_router, spawn_revocation_compaction};
use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().nth(1).as_deref() == Some("hash-password") {
        return hash_password_from_stdin();
    }

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("auth_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Peoplecount Auth API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        access_secs = config.auth.access_lifetime.as_secs(),
        refresh_secs = config.auth.refresh_lifetime.as_secs(),
        admin_local_only = config.admin_local_only,
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create application state
    let compaction_interval = config.auth.compaction_interval;
    let http_port = config.http_port;
    let state = AppState::from_config(config)?;

    let compaction = spawn_revocation_compaction(Arc::clone(&state.gateway), compaction_interval);

    // Build HTTP router
    let app = build_router(state, metrics_handle);

    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    run_http_server(app, addr).await?;

    compaction.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let service: IntoMakeServiceWithConnectInfo<Router, SocketAddr> =
        app.into_make_service_with_connect_info();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!(
        peoplecount_auth_core::metrics::TOKENS_ISSUED_TOTAL,
        "Total tokens minted by kind"
    );
    metrics::describe_counter!(
        peoplecount_auth_core::metrics::TOKEN_CHECKS_TOTAL,
        "Total token checks by outcome"
    );
    metrics::describe_counter!(
        peoplecount_auth_core::metrics::LOGINS_TOTAL,
        "Total login attempts by outcome"
    );
    metrics::describe_counter!(
        peoplecount_auth_core::metrics::REVOCATIONS_TOTAL,
        "Total tokens revoked by logout"
    );
    metrics::describe_counter!(
        peoplecount_auth_core::metrics::POLICY_CHANGES_TOTAL,
        "Total token lifetime changes"
    );
    metrics::describe_gauge!(
        peoplecount_auth_core::metrics::REVOKED_TOKENS,
        "Entries held by the revocation registry"
    );

    Ok(handle)
}

fn hash_password_from_stdin() -> anyhow::Result<()> {
    let mut password = String::new();
    std::io::stdin().lock().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("expected a password on stdin");
    }

    println!("{}", peoplecount_auth_core::hash_password(password)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
