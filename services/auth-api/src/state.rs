//! Application state

use std::sync::Arc;

use peoplecount_auth_core::{
    AuthError, AuthGateway, BasicAdminAuthorizer, Clock, StaticCredentialVerifier, SystemClock,
};

use crate::config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth gateway owning policy and revocation state
    pub gateway: Arc<AuthGateway>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(gateway: AuthGateway, config: Config) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config: Arc::new(config),
        }
    }

    /// Build the gateway from config using the wall clock
    pub fn from_config(config: Config) -> Result<Self, AuthError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build the gateway from config with an explicit clock
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        let verifier =
            StaticCredentialVerifier::new(&config.login.username, &config.login.password_hash)?;
        let admin = BasicAdminAuthorizer::new(StaticCredentialVerifier::new(
            &config.admin.username,
            &config.admin.password_hash,
        )?)
        .local_only(config.admin_local_only);

        let gateway =
            AuthGateway::new(&config.auth, Arc::new(verifier), Arc::new(admin), clock)?;
        Ok(Self::new(gateway, config))
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}
