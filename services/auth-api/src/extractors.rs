//! Axum extractors for credentials carried in headers

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use peoplecount_auth_core::{AdminCredentials, AuthError};

use crate::error::ApiError;

/// Token from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        peoplecount_axum::bearer_token(&parts.headers)
            .map(|token| Self(token.to_string()))
            .ok_or(ApiError::Auth(AuthError::MissingToken))
    }
}

/// Operator credential from `Authorization: Basic`, plus the peer address
#[derive(Debug, Clone)]
pub struct AdminAuth(pub AdminCredentials);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (username, password) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_basic)
            .ok_or(ApiError::Auth(AuthError::AdminCredentialsMissing))?;

        // Served connect info, or MockConnectInfo when layered
        let peer = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|ConnectInfo(addr)| addr.ip());

        Ok(Self(AdminCredentials {
            username,
            password,
            peer,
        }))
    }
}

/// Parse `Basic base64(username:password)`
fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
