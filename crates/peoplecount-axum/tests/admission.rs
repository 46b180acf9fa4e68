//! Admission middleware tests against a real router

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use peoplecount_auth_core::{
    AdminAuthorizer, AdminCredentials, AuthConfig, AuthError, AuthGateway, Clock,
    CredentialVerifier, ManualClock, PolicyUpdate,
};
use peoplecount_axum::{AdmissionLayer, RequireAuth};
use peoplecount_types::Timestamp;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct OneUser;

#[async_trait]
impl CredentialVerifier for OneUser {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        Ok(username == "AdminHS" && password == "Secret123")
    }
}

struct AnyAdmin;

#[async_trait]
impl AdminAuthorizer for AnyAdmin {
    async fn authorize(&self, _: &AdminCredentials) -> Result<(), AuthError> {
        Ok(())
    }
}

fn setup() -> (Router, Arc<AuthGateway>, ManualClock) {
    let clock = ManualClock::new(Timestamp::from_millis(1_700_000_000_000));
    let gateway = Arc::new(
        AuthGateway::new(
            &AuthConfig::new("axum-test-secret-axum-test-secret"),
            Arc::new(OneUser),
            Arc::new(AnyAdmin),
            Arc::new(clock.clone()),
        )
        .unwrap(),
    );

    async fn protected(auth: RequireAuth) -> String {
        format!("Hello {}", auth.subject)
    }

    async fn open() -> &'static str {
        "open"
    }

    let router = Router::new()
        .route("/protected", get(protected))
        .route_layer(AdmissionLayer::new(Arc::clone(&gateway)))
        .route("/open", get(open))
        .route("/unguarded", get(protected));

    (router, gateway, clock)
}

async fn send(router: &Router, uri: &str, token: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn error_code(response: Response) -> String {
    let value: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    value["error"]["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn admitted_request_reaches_handler_with_subject() {
    let (router, gateway, _clock) = setup();
    let login = gateway.login("AdminHS", "Secret123").await.unwrap();

    let response = send(&router, "/protected", Some(&login.tokens.access.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Hello AdminHS");
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let (router, _gateway, _clock) = setup();
    let response = send(&router, "/protected", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "MISSING_TOKEN");
}

#[tokio::test]
async fn refresh_token_is_wrong_type() {
    let (router, gateway, _clock) = setup();
    let login = gateway.login("AdminHS", "Secret123").await.unwrap();

    let response = send(&router, "/protected", Some(&login.tokens.refresh.token)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(response).await, "WRONG_TOKEN_TYPE");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let (router, _gateway, _clock) = setup();
    let response = send(&router, "/protected", Some("not-a-token")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(response).await, "INVALID_TOKEN");
}

#[tokio::test]
async fn expired_revoked_and_cutoff_look_the_same() {
    let (router, gateway, clock) = setup();

    let revoked = gateway.login("AdminHS", "Secret123").await.unwrap();
    gateway.logout(&revoked.tokens.access.token).unwrap();
    let revoked_body = body_string(send(&router, "/protected", Some(&revoked.tokens.access.token)).await).await;

    let cut = gateway.login("AdminHS", "Secret123").await.unwrap();
    clock.advance(Duration::from_millis(1));
    gateway
        .change_policy(
            &AdminCredentials {
                username: "op".into(),
                password: "pw".into(),
                peer: None,
            },
            PolicyUpdate::access(Duration::from_secs(1)),
        )
        .await
        .unwrap();
    let cut_body = body_string(send(&router, "/protected", Some(&cut.tokens.access.token)).await).await;

    let short = gateway.login("AdminHS", "Secret123").await.unwrap();
    clock.set(short.tokens.access.expires_at);
    assert_eq!(clock.now(), short.tokens.access.expires_at);
    let expired_body = body_string(send(&router, "/protected", Some(&short.tokens.access.token)).await).await;

    assert_eq!(revoked_body, cut_body);
    assert_eq!(cut_body, expired_body);
    assert!(revoked_body.contains("TOKEN_NOT_VALID"));
}

#[tokio::test]
async fn routes_outside_layer_are_open() {
    let (router, _gateway, _clock) = setup();
    let response = send(&router, "/open", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Extractor without the layer cannot find a context
    let response = send(&router, "/unguarded", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
