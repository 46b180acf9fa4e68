//! Auth gateway - login, refresh, logout, admission and policy changes
//!
//! Policy and revocation state live behind one lock so a policy change and
//! the cutoff it sets are observed together.

use parking_lot::RwLock;
use std::sync::Arc;

use peoplecount_types::{IssuedToken, Timestamp, TokenId, TokenKind, TokenPair};

use crate::{
    admin::{AdminAuthorizer, AdminCredentials},
    clock::Clock,
    config::AuthConfig,
    credentials::CredentialVerifier,
    crypto::{fingerprint, SigningKey},
    metrics,
    policy::{Lifetimes, PolicyStore, PolicyUpdate},
    revocation::RevocationRegistry,
    token::{TokenClaims, TokenCodec},
    AuthError,
};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Authenticated identity
    pub subject: String,
    /// Freshly minted access and refresh tokens
    pub tokens: TokenPair,
}

/// Result of a logout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// Token added to the revocation registry
    Revoked,
    /// Token was already revoked
    AlreadyRevoked,
    /// Token already expired; nothing left to revoke
    AlreadyExpired,
}

/// Identity handed to a protected handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub subject: String,
    pub token_id: TokenId,
    pub expires_at: Timestamp,
}

struct TokenState {
    policy: PolicyStore,
    registry: RevocationRegistry,
}

/// Orchestrates the token lifecycle
pub struct AuthGateway {
    codec: TokenCodec,
    clock: Arc<dyn Clock>,
    verifier: Arc<dyn CredentialVerifier>,
    admin: Arc<dyn AdminAuthorizer>,
    state: RwLock<TokenState>,
}

impl AuthGateway {
    /// Create a gateway from config and its collaborators
    pub fn new(
        config: &AuthConfig,
        verifier: Arc<dyn CredentialVerifier>,
        admin: Arc<dyn AdminAuthorizer>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let key = SigningKey::new(config.signing_secret.as_bytes())
            .map_err(|e| AuthError::Configuration(e.to_string()))?;
        let policy = PolicyStore::new(Lifetimes {
            access: config.access_lifetime,
            refresh: config.refresh_lifetime,
        })?;

        Ok(Self {
            codec: TokenCodec::new(key, Arc::clone(&clock)),
            clock,
            verifier,
            admin,
            state: RwLock::new(TokenState {
                policy,
                registry: RevocationRegistry::new(),
            }),
        })
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Verify credentials and mint an access/refresh pair.
    ///
    /// Both a wrong username and a wrong password yield `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let ok = self.verifier.verify(username, password).await?;
        metrics::record_login(ok);
        if !ok {
            tracing::warn!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        // Mint under the read guard so a concurrent policy change is either
        // fully before or fully after this login
        let tokens = {
            let state = self.state.read();
            let lifetimes = state.policy.get();
            TokenPair {
                access: self.mint(username, TokenKind::Access, lifetimes)?,
                refresh: self.mint(username, TokenKind::Refresh, lifetimes)?,
            }
        };

        tracing::debug!(
            access = %fingerprint(&tokens.access.token),
            refresh = %fingerprint(&tokens.refresh.token),
            "Issued token pair"
        );

        Ok(LoginOutcome {
            subject: username.to_string(),
            tokens,
        })
    }

    /// Exchange an honored refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated.
    pub fn refresh(&self, token: &str) -> Result<IssuedToken, AuthError> {
        let state = self.state.read();
        let claims = self.check(&state, token, TokenKind::Refresh)?;
        let issued = self.mint(&claims.sub, TokenKind::Access, state.policy.get())?;
        drop(state);

        tracing::debug!(
            refresh = %fingerprint(token),
            access = %fingerprint(&issued.token),
            "Refreshed access token"
        );
        Ok(issued)
    }

    fn mint(
        &self,
        subject: &str,
        kind: TokenKind,
        lifetimes: Lifetimes,
    ) -> Result<IssuedToken, AuthError> {
        let lifetime = match kind {
            TokenKind::Access => lifetimes.access,
            TokenKind::Refresh => lifetimes.refresh,
        };
        let issued = self.codec.mint(subject, kind, lifetime)?;
        metrics::record_issued(kind);
        Ok(issued)
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Decide whether an access token may reach a protected handler
    pub fn admit(&self, token: &str) -> Result<Admission, AuthError> {
        let state = self.state.read();
        let claims = self.check(&state, token, TokenKind::Access)?;
        Ok(Admission {
            subject: claims.sub,
            token_id: claims.jti,
            expires_at: claims.expires_at,
        })
    }

    /// Full honored check: decode, kind, revocation, cutoff - in that order
    fn check(
        &self,
        state: &TokenState,
        token: &str,
        expected: TokenKind,
    ) -> Result<TokenClaims, AuthError> {
        let result = self.codec.decode(token).and_then(|claims| {
            if claims.kind != expected {
                return Err(AuthError::WrongTokenType {
                    expected,
                    actual: claims.kind,
                });
            }
            if state.registry.is_revoked(&claims.jti) {
                return Err(AuthError::Revoked);
            }
            if state.registry.is_before_cutoff(claims.issued_at) {
                return Err(AuthError::IssuedBeforeCutoff);
            }
            Ok(claims)
        });

        metrics::record_check(result.as_ref().map(|_| ()));
        match &result {
            Err(e) if e.is_no_longer_valid() => tracing::debug!(
                reason = e.diagnostic(),
                token = %fingerprint(token),
                "Token no longer valid"
            ),
            Err(e) => tracing::info!(
                reason = e.diagnostic(),
                token = %fingerprint(token),
                expected = %expected,
                "Token rejected"
            ),
            Ok(_) => {}
        }
        result
    }

    // =========================================================================
    // Revocation
    // =========================================================================

    /// Revoke the presented token, access or refresh.
    ///
    /// Revoking twice succeeds both times. An expired token needs no entry.
    pub fn logout(&self, token: &str) -> Result<LogoutOutcome, AuthError> {
        let claims = self.codec.decode_unchecked_window(token).inspect_err(|e| {
            tracing::debug!(reason = e.diagnostic(), token = %fingerprint(token), "Logout rejected");
        })?;

        match claims.check_window(self.clock.now()) {
            Ok(()) => {}
            Err(AuthError::Expired) => {
                tracing::debug!(token = %fingerprint(token), "Logout of expired token");
                return Ok(LogoutOutcome::AlreadyExpired);
            }
            Err(e) => return Err(e),
        }

        let mut state = self.state.write();
        if !state.registry.revoke(claims.jti, claims.expires_at) {
            return Ok(LogoutOutcome::AlreadyRevoked);
        }
        let size = state.registry.len();
        drop(state);

        metrics::record_revocation(size);
        tracing::debug!(token = %fingerprint(token), kind = %claims.kind, "Token revoked");
        Ok(LogoutOutcome::Revoked)
    }

    /// Drop revocation entries whose tokens have expired
    pub fn compact_revocations(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.state.write();
        let removed = state.registry.compact(now);
        let size = state.registry.len();
        drop(state);

        metrics::record_registry_size(size);
        if removed > 0 {
            tracing::debug!(removed, remaining = size, "Compacted revocation registry");
        }
        removed
    }

    /// Number of entries in the revocation registry
    pub fn revoked_count(&self) -> usize {
        self.state.read().registry.len()
    }

    // =========================================================================
    // Policy
    // =========================================================================

    /// Change token lifetimes and invalidate every token issued before now.
    ///
    /// The operator credential is checked first; the policy update and the
    /// cutoff advance then happen under a single write guard.
    pub async fn change_policy(
        &self,
        credentials: &AdminCredentials,
        update: PolicyUpdate,
    ) -> Result<Lifetimes, AuthError> {
        self.authorize_admin(credentials).await?;

        let (applied, cutoff) = {
            let mut state = self.state.write();
            let applied = state.policy.set(update)?;
            let now = self.clock.now();
            state.registry.advance_cutoff(now);
            (applied, state.registry.cutoff())
        };

        metrics::record_policy_change();
        tracing::info!(
            access_secs = applied.access.as_secs(),
            refresh_secs = applied.refresh.as_secs(),
            cutoff = ?cutoff,
            "Token policy changed"
        );
        Ok(applied)
    }

    /// Check an operator credential without changing anything
    pub async fn authorize_admin(&self, credentials: &AdminCredentials) -> Result<(), AuthError> {
        self.admin.authorize(credentials).await
    }

    /// Current token lifetimes
    pub fn lifetimes(&self) -> Lifetimes {
        self.state.read().policy.get()
    }

    /// Current issuance cutoff
    pub fn cutoff(&self) -> Option<Timestamp> {
        self.state.read().registry.cutoff()
    }
}

impl std::fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGateway")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedVerifier;

    #[async_trait]
    impl CredentialVerifier for FixedVerifier {
        async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
            Ok(username == "AdminHS" && password == "Secret123")
        }
    }

    struct AllowAdmin;

    #[async_trait]
    impl AdminAuthorizer for AllowAdmin {
        async fn authorize(&self, credentials: &AdminCredentials) -> Result<(), AuthError> {
            if credentials.password == "root" {
                Ok(())
            } else {
                Err(AuthError::AdminAuthFailed)
            }
        }
    }

    fn gateway() -> (AuthGateway, ManualClock) {
        let clock = ManualClock::new(Timestamp::from_millis(1_000));
        let config = AuthConfig::new("0123456789abcdef0123456789abcdef");
        let gateway = AuthGateway::new(
            &config,
            Arc::new(FixedVerifier),
            Arc::new(AllowAdmin),
            Arc::new(clock.clone()),
        )
        .unwrap();
        (gateway, clock)
    }

    fn admin(password: &str) -> AdminCredentials {
        AdminCredentials {
            username: "operator".into(),
            password: password.into(),
            peer: None,
        }
    }

    #[test]
    fn test_new_rejects_short_secret() {
        let result = AuthGateway::new(
            &AuthConfig::new("short"),
            Arc::new(FixedVerifier),
            Arc::new(AllowAdmin),
            Arc::new(ManualClock::default()),
        );
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_login_and_admit() {
        let (gateway, _clock) = gateway();
        let outcome = gateway.login("AdminHS", "Secret123").await.unwrap();
        assert_eq!(outcome.subject, "AdminHS");
        assert_eq!(outcome.tokens.access.kind, TokenKind::Access);
        assert_eq!(outcome.tokens.refresh.kind, TokenKind::Refresh);

        let admission = gateway.admit(&outcome.tokens.access.token).unwrap();
        assert_eq!(admission.subject, "AdminHS");
        assert_eq!(admission.token_id, outcome.tokens.access.id);
    }

    #[tokio::test]
    async fn test_login_failure_is_uniform() {
        let (gateway, _clock) = gateway();
        let wrong_user = gateway.login("nobody", "Secret123").await.unwrap_err();
        let wrong_pass = gateway.login("AdminHS", "nope").await.unwrap_err();
        assert!(matches!(wrong_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_user.public_message(), wrong_pass.public_message());
    }

    #[tokio::test]
    async fn test_refresh_mints_access_only() {
        let (gateway, _clock) = gateway();
        let outcome = gateway.login("AdminHS", "Secret123").await.unwrap();

        let fresh = gateway.refresh(&outcome.tokens.refresh.token).unwrap();
        assert_eq!(fresh.kind, TokenKind::Access);
        assert!(gateway.admit(&fresh.token).is_ok());
        // The refresh token still works
        assert!(gateway.refresh(&outcome.tokens.refresh.token).is_ok());
    }

    #[tokio::test]
    async fn test_kind_mismatch_both_directions() {
        let (gateway, _clock) = gateway();
        let outcome = gateway.login("AdminHS", "Secret123").await.unwrap();

        let err = gateway.admit(&outcome.tokens.refresh.token).unwrap_err();
        assert!(matches!(
            err,
            AuthError::WrongTokenType { expected: TokenKind::Access, actual: TokenKind::Refresh }
        ));
        let err = gateway.refresh(&outcome.tokens.access.token).unwrap_err();
        assert!(matches!(
            err,
            AuthError::WrongTokenType { expected: TokenKind::Refresh, actual: TokenKind::Access }
        ));
    }

    #[tokio::test]
    async fn test_logout_outcomes() {
        let (gateway, clock) = gateway();
        let outcome = gateway.login("AdminHS", "Secret123").await.unwrap();
        let access = &outcome.tokens.access.token;

        assert_eq!(gateway.logout(access).unwrap(), LogoutOutcome::Revoked);
        assert_eq!(gateway.logout(access).unwrap(), LogoutOutcome::AlreadyRevoked);
        assert!(matches!(gateway.admit(access), Err(AuthError::Revoked)));
        assert_eq!(gateway.revoked_count(), 1);

        clock.advance(Duration::from_secs(86_400));
        assert_eq!(
            gateway.logout(&outcome.tokens.refresh.token).unwrap(),
            LogoutOutcome::AlreadyExpired
        );
        assert!(matches!(gateway.logout("garbage"), Err(AuthError::MalformedToken)));
    }

    #[tokio::test]
    async fn test_change_policy_sets_cutoff() {
        let (gateway, clock) = gateway();
        let before = gateway.login("AdminHS", "Secret123").await.unwrap();

        clock.advance(Duration::from_millis(1));
        let applied = gateway
            .change_policy(&admin("root"), PolicyUpdate::access(Duration::from_secs(1)))
            .await
            .unwrap();
        assert_eq!(applied.access, Duration::from_secs(1));
        assert_eq!(gateway.cutoff(), Some(clock.now()));

        assert!(matches!(
            gateway.admit(&before.tokens.access.token),
            Err(AuthError::IssuedBeforeCutoff)
        ));
        assert!(matches!(
            gateway.refresh(&before.tokens.refresh.token),
            Err(AuthError::IssuedBeforeCutoff)
        ));

        // Minted in the cutoff millisecond: still honored
        let after = gateway.login("AdminHS", "Secret123").await.unwrap();
        assert!(gateway.admit(&after.tokens.access.token).is_ok());
        assert_eq!(after.tokens.access.expires_in_secs(), 1);
    }

    #[tokio::test]
    async fn test_change_policy_failures_leave_state() {
        let (gateway, _clock) = gateway();
        let before = gateway.lifetimes();

        let err = gateway
            .change_policy(&admin("wrong"), PolicyUpdate::access(Duration::from_secs(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AdminAuthFailed));

        let err = gateway
            .change_policy(&admin("root"), PolicyUpdate::access(Duration::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidPolicy(_)));

        assert_eq!(gateway.lifetimes(), before);
        assert_eq!(gateway.cutoff(), None);
    }

    #[tokio::test]
    async fn test_compaction_after_expiry() {
        let (gateway, clock) = gateway();
        let outcome = gateway.login("AdminHS", "Secret123").await.unwrap();
        gateway.logout(&outcome.tokens.access.token).unwrap();

        assert_eq!(gateway.compact_revocations(), 0);
        clock.advance(Duration::from_secs(86_400));
        assert_eq!(gateway.compact_revocations(), 1);
        assert_eq!(gateway.revoked_count(), 0);
        // Still rejected, now on expiry alone
        assert!(matches!(
            gateway.admit(&outcome.tokens.access.token),
            Err(AuthError::Expired)
        ));
    }
}
