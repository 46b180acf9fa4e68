//! Rejection responses for auth middleware and extractors.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use peoplecount_auth_core::AuthError;
use serde::{Deserialize, Serialize};

/// JSON error body: `{"error": {"code", "message"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error code and caller-facing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    /// Build a body from a code and message.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// Auth failure turned into an HTTP response.
///
/// Only the public face of the error reaches the caller; expired, revoked and
/// pre-cutoff tokens produce identical responses.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AuthRejection(#[from] pub AuthError);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %err, "Auth processing failed");
        }

        let body = ErrorBody::new(err.error_code(), err.public_message());
        let mut response = (status, Json(body)).into_response();

        let challenge = match err {
            AuthError::AdminCredentialsMissing => Some(r#"Basic realm="admin""#),
            AuthError::MissingToken => Some("Bearer"),
            _ => None,
        };
        if let Some(challenge) = challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }

        response
    }
}
