//! Configuration types for the auth core

use std::time::Duration;

use crate::crypto::SigningKey;
use crate::AuthError;

/// Auth core configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for token signing (at least 32 bytes)
    pub signing_secret: String,
    /// Initial access token lifetime
    pub access_lifetime: Duration,
    /// Initial refresh token lifetime
    pub refresh_lifetime: Duration,
    /// How often expired revocation entries are swept
    pub compaction_interval: Duration,
}

impl AuthConfig {
    /// Create a new auth config with default lifetimes
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            access_lifetime: Duration::from_secs(24 * 60 * 60), // 1 day
            refresh_lifetime: Duration::from_secs(24 * 60 * 60), // 1 day
            compaction_interval: Duration::from_secs(5 * 60),
        }
    }

    /// Create a config, rejecting secrets too short to sign with
    pub fn try_new(signing_secret: impl Into<String>) -> Result<Self, AuthError> {
        let config = Self::new(signing_secret);
        SigningKey::new(config.signing_secret.as_bytes())
            .map_err(|e| AuthError::Configuration(e.to_string()))?;
        Ok(config)
    }

    /// Set access token lifetime
    pub fn with_access_lifetime(mut self, lifetime: Duration) -> Self {
        self.access_lifetime = lifetime;
        self
    }

    /// Set refresh token lifetime
    pub fn with_refresh_lifetime(mut self, lifetime: Duration) -> Self {
        self.refresh_lifetime = lifetime;
        self
    }

    /// Set revocation compaction interval
    pub fn with_compaction_interval(mut self, interval: Duration) -> Self {
        self.compaction_interval = interval;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret_len", &self.signing_secret.len())
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .field("compaction_interval", &self.compaction_interval)
            .finish()
    }
}
