//! Signed token minting and decoding

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use peoplecount_types::{IssuedToken, Timestamp, TokenId, TokenKind};

use crate::clock::Clock;
use crate::crypto::SigningKey;
use crate::AuthError;

/// Signed payload of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject identity
    pub sub: String,
    /// Access or refresh
    pub kind: TokenKind,
    /// Unique identifier, used for revocation
    pub jti: TokenId,
    /// Issue time (unix ms)
    #[serde(rename = "issued")]
    pub issued_at: Timestamp,
    /// Expiry time (unix ms, exclusive)
    #[serde(rename = "expires")]
    pub expires_at: Timestamp,
}

impl TokenClaims {
    /// Check the validity window `issued_at <= now < expires_at`
    pub fn check_window(&self, now: Timestamp) -> Result<(), AuthError> {
        if self.expires_at <= self.issued_at || self.issued_at > now {
            return Err(AuthError::MalformedToken);
        }
        if now >= self.expires_at {
            return Err(AuthError::Expired);
        }
        Ok(())
    }
}

/// HS256 token codec.
///
/// The JWT library only checks structure and signature. Expiry is judged
/// against the injected clock so tests and the revocation cutoff share one
/// notion of "now".
#[derive(Clone)]
pub struct TokenCodec {
    key: SigningKey,
    clock: Arc<dyn Clock>,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec signing with `key` and reading time from `clock`
    pub fn new(key: SigningKey, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            key,
            clock,
            validation,
        }
    }

    /// Mint a token for `subject` valid for `lifetime` from now
    pub fn mint(
        &self,
        subject: &str,
        kind: TokenKind,
        lifetime: Duration,
    ) -> Result<IssuedToken, AuthError> {
        let issued_at = self.clock.now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            kind,
            jti: TokenId::new(),
            issued_at,
            expires_at: issued_at.saturating_add(lifetime),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, self.key.encoding())
            .map_err(|e| {
                tracing::error!("Failed to sign token: {}", e);
                AuthError::Internal("token signing failed".to_string())
            })?;

        Ok(IssuedToken {
            token,
            id: claims.jti,
            kind,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        })
    }

    /// Verify signature, parse claims and check the validity window
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.decode_unchecked_window(token)?;
        claims.check_window(self.clock.now())?;
        Ok(claims)
    }

    /// Verify signature and parse claims without judging expiry
    pub fn decode_unchecked_window(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, self.key.decoding(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::BadSignature
                }
                _ => AuthError::MalformedToken,
            })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
