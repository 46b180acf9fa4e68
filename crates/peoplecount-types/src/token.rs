//! Token types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Timestamp;

/// Which role a token plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented to protected routes
    Access,
    /// Longer-lived token exchanged for new access tokens
    Refresh,
}

impl TokenKind {
    /// Lowercase name used in claims, logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique token identifier (the `jti` claim)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub Uuid);

impl TokenId {
    /// Create a new random token ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A freshly minted, signed token and the facts it was signed over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded, signed token
    pub token: String,
    /// Identifier used for revocation
    pub id: TokenId,
    /// Access or refresh
    pub kind: TokenKind,
    /// Issue time
    pub issued_at: Timestamp,
    /// Expiry time (exclusive)
    pub expires_at: Timestamp,
}

impl IssuedToken {
    /// Whole seconds of validity granted at issue time
    pub fn expires_in_secs(&self) -> u64 {
        self.issued_at.until(self.expires_at).as_secs()
    }
}

/// Access and refresh tokens returned after a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Access token (short-lived)
    pub access: IssuedToken,
    /// Refresh token (long-lived)
    pub refresh: IssuedToken,
}
