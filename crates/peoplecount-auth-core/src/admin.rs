//! Operator authorization for policy changes
//!
//! Changing token lifetimes must keep working while every outstanding token
//! is about to be invalidated, so it is gated by a credential that is not a
//! token issued by this service.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::credentials::{CredentialVerifier, StaticCredentialVerifier};
use crate::AuthError;

/// Operator credential presented with a policy change
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
    /// Address the request came from, when known
    pub peer: Option<IpAddr>,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}

/// Decides whether an operator may change token policy
#[async_trait]
pub trait AdminAuthorizer: Send + Sync {
    /// `Ok(())` if the operator is allowed, `AdminAuthFailed` otherwise
    async fn authorize(&self, credentials: &AdminCredentials) -> Result<(), AuthError>;
}

/// Username/password operator credential, optionally restricted to loopback peers
#[derive(Debug, Clone)]
pub struct BasicAdminAuthorizer {
    verifier: StaticCredentialVerifier,
    local_only: bool,
}

impl BasicAdminAuthorizer {
    /// Create an authorizer; loopback-only by default
    pub fn new(verifier: StaticCredentialVerifier) -> Self {
        Self {
            verifier,
            local_only: true,
        }
    }

    /// Set whether requests must originate from a loopback address
    #[must_use]
    pub fn local_only(mut self, local_only: bool) -> Self {
        self.local_only = local_only;
        self
    }
}

#[async_trait]
impl AdminAuthorizer for BasicAdminAuthorizer {
    async fn authorize(&self, credentials: &AdminCredentials) -> Result<(), AuthError> {
        if self.local_only && !credentials.peer.is_some_and(|ip| ip.is_loopback()) {
            tracing::warn!(peer = ?credentials.peer, "Admin request from non-local peer rejected");
            return Err(AuthError::AdminAuthFailed);
        }

        let ok = self
            .verifier
            .verify(&credentials.username, &credentials.password)
            .await?;
        if !ok {
            tracing::warn!(peer = ?credentials.peer, "Admin credential rejected");
            return Err(AuthError::AdminAuthFailed);
        }

        Ok(())
    }
}
