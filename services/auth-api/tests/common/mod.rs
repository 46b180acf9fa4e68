//! Shared helpers for auth-api route tests

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use auth_api::build_router;
use auth_api::config::{Config, CredentialConfig};
use auth_api::state::AppState;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::BodyExt;
use peoplecount_auth_core::{AuthConfig, ManualClock};
use peoplecount_types::Timestamp;
use serde_json::Value;
use tower::ServiceExt;

pub const USERNAME: &str = "AdminHS";
pub const PASSWORD: &str = "Secret123";
pub const ADMIN_USERNAME: &str = "operator";
pub const ADMIN_PASSWORD: &str = "root-pw";

/// Low-cost Argon2id PHC hash
pub fn cheap_hash(password: &str) -> String {
    let argon2 = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(8, 1, 1, None).expect("params"),
    );
    let salt = SaltString::encode_b64(b"route-test-salt!").expect("salt");
    argon2
        .hash_password(password.as_bytes(), &salt)
        .expect("hash")
        .to_string()
}

pub fn test_config() -> Config {
    Config {
        http_port: 0,
        auth: AuthConfig::new("route-test-secret-route-test-secret")
            .with_access_lifetime(Duration::from_secs(86_400))
            .with_refresh_lifetime(Duration::from_secs(86_400)),
        login: CredentialConfig {
            username: USERNAME.to_string(),
            password_hash: cheap_hash(PASSWORD),
        },
        admin: CredentialConfig {
            username: ADMIN_USERNAME.to_string(),
            password_hash: cheap_hash(ADMIN_PASSWORD),
        },
        admin_local_only: true,
        request_timeout: Duration::from_secs(30),
        metrics_enabled: false,
    }
}

/// Router plus handles for driving it
pub struct TestApp {
    pub router: Router,
    #[allow(dead_code)]
    pub state: AppState,
    pub clock: ManualClock,
}

/// App whose requests appear to come from `peer`
pub fn test_app_from(peer: SocketAddr) -> TestApp {
    let clock = ManualClock::new(Timestamp::from_millis(1_700_000_000_000));
    let state = AppState::with_clock(test_config(), Arc::new(clock.clone())).expect("state");
    let router = build_router(state.clone(), None).layer(MockConnectInfo(peer));
    TestApp {
        router,
        state,
        clock,
    }
}

/// App whose requests come from loopback
pub fn test_app() -> TestApp {
    test_app_from(SocketAddr::from(([127, 0, 0, 1], 40_000)))
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.expect("response")
    }

    pub async fn post_json(&self, uri: &str, body: Value, auth: Option<String>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        self.send(builder.body(Body::from(body.to_string())).expect("request"))
            .await
    }

    pub async fn get(&self, uri: &str, auth: Option<String>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        self.send(builder.body(Body::empty()).expect("request")).await
    }

    /// Log in and return (access_token, refresh_token)
    #[allow(dead_code)]
    pub async fn login(&self) -> (String, String) {
        let response = self
            .post_json(
                "/login",
                serde_json::json!({"username": USERNAME, "password": PASSWORD}),
                None,
            )
            .await;
        let body = body_json(response).await;
        (
            body["access_token"].as_str().expect("access").to_string(),
            body["refresh_token"].as_str().expect("refresh").to_string(),
        )
    }
}

pub fn bearer(token: &str) -> Option<String> {
    Some(format!("Bearer {token}"))
}

#[allow(dead_code)]
pub fn basic(username: &str, password: &str) -> Option<String> {
    Some(format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))))
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
