//! Auth errors

use peoplecount_types::TokenKind;
use thiserror::Error;

/// Authentication errors
///
/// Variants are fine-grained for logs and metrics. The public face of an
/// error (`status_code`, `error_code`, `public_message`) deliberately
/// collapses expired, revoked and pre-cutoff tokens into one outcome.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Username or password did not match
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token is not a well-formed signed token
    #[error("malformed token")]
    MalformedToken,

    /// Token signature does not verify
    #[error("bad token signature")]
    BadSignature,

    /// Token has expired
    #[error("token expired")]
    Expired,

    /// Token was explicitly revoked
    #[error("token revoked")]
    Revoked,

    /// Token was issued before the current issuance cutoff
    #[error("token issued before cutoff")]
    IssuedBeforeCutoff,

    /// Token of the wrong kind for the operation
    #[error("expected {expected} token, got {actual}")]
    WrongTokenType {
        expected: TokenKind,
        actual: TokenKind,
    },

    /// Rejected token lifetime update
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// No token supplied
    #[error("missing token")]
    MissingToken,

    /// No admin credential supplied
    #[error("admin credentials missing")]
    AdminCredentialsMissing,

    /// Admin credential rejected
    #[error("admin authorization failed")]
    AdminAuthFailed,

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::Expired
            | Self::Revoked
            | Self::IssuedBeforeCutoff
            | Self::AdminCredentialsMissing => 401,
            Self::MalformedToken | Self::BadSignature | Self::WrongTokenType { .. } => 422,
            Self::InvalidPolicy(_) => 400,
            Self::AdminAuthFailed => 403,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingToken => "MISSING_TOKEN",
            Self::Expired | Self::Revoked | Self::IssuedBeforeCutoff => "TOKEN_NOT_VALID",
            Self::MalformedToken | Self::BadSignature => "INVALID_TOKEN",
            Self::WrongTokenType { .. } => "WRONG_TOKEN_TYPE",
            Self::InvalidPolicy(_) => "INVALID_POLICY",
            Self::AdminCredentialsMissing => "ADMIN_AUTH_REQUIRED",
            Self::AdminAuthFailed => "ADMIN_AUTH_FAILED",
            Self::Configuration(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "invalid credentials".to_string(),
            Self::MissingToken => "missing authorization token".to_string(),
            Self::Expired | Self::Revoked | Self::IssuedBeforeCutoff => {
                "token no longer valid".to_string()
            }
            Self::MalformedToken | Self::BadSignature => "invalid token".to_string(),
            Self::WrongTokenType { expected, .. } => {
                format!("only {expected} tokens are allowed")
            }
            Self::InvalidPolicy(reason) => reason.clone(),
            Self::AdminCredentialsMissing => "admin authentication required".to_string(),
            Self::AdminAuthFailed => "invalid admin credentials".to_string(),
            Self::Configuration(_) | Self::Internal(_) => "internal error".to_string(),
        }
    }

    /// Short internal label for logs and metrics
    pub fn diagnostic(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::MalformedToken => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
            Self::IssuedBeforeCutoff => "before_cutoff",
            Self::WrongTokenType { .. } => "wrong_type",
            Self::InvalidPolicy(_) => "invalid_policy",
            Self::MissingToken => "missing",
            Self::AdminCredentialsMissing => "admin_missing",
            Self::AdminAuthFailed => "admin_failed",
            Self::Configuration(_) => "configuration",
            Self::Internal(_) => "internal",
        }
    }

    /// True for the outcomes that are collapsed into "token no longer valid"
    pub fn is_no_longer_valid(&self) -> bool {
        matches!(self, Self::Expired | Self::Revoked | Self::IssuedBeforeCutoff)
    }
}
