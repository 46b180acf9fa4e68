//! Configuration for the Auth API service.

use peoplecount_auth_core::AuthConfig;
use std::time::Duration;

/// Username and PHC password hash for one identity
#[derive(Clone)]
pub struct CredentialConfig {
    pub username: String,
    pub password_hash: String,
}

impl std::fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Login credential
    pub login: CredentialConfig,

    /// Operator credential for policy changes
    pub admin: CredentialConfig,

    /// Only accept admin requests from loopback peers
    pub admin_local_only: bool,

    /// Request timeout
    pub request_timeout: Duration,

    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        let http_port = parse_or(&lookup, "HTTP_PORT", 5000u16)?;

        // Signing secret (minimum 32 bytes)
        let secret = lookup("JWT_SECRET_KEY").ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;

        // Token lifetimes (default one day each)
        let access_secs = positive_secs(&lookup, "JWT_ACCESS_TOKEN_EXPIRES_SECONDS", 86_400)?;
        let refresh_secs = positive_secs(&lookup, "JWT_REFRESH_TOKEN_EXPIRES_SECONDS", 86_400)?;
        let compaction_secs = positive_secs(&lookup, "REVOCATION_COMPACTION_SECS", 300)?;

        // Login credential
        let login = CredentialConfig {
            username: lookup("AUTH_USERNAME").ok_or(ConfigError::Missing("AUTH_USERNAME"))?,
            password_hash: lookup("AUTH_PASSWORD_HASH")
                .ok_or(ConfigError::Missing("AUTH_PASSWORD_HASH"))?,
        };

        // Admin credential, falling back to the login credential
        let admin = match (lookup("ADMIN_USERNAME"), lookup("ADMIN_PASSWORD_HASH")) {
            (Some(username), Some(password_hash)) => CredentialConfig {
                username,
                password_hash,
            },
            (None, None) => {
                tracing::warn!(
                    "ADMIN_USERNAME/ADMIN_PASSWORD_HASH not set; admin endpoint uses the login credential"
                );
                login.clone()
            }
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD_HASH")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_USERNAME")),
        };

        let admin_local_only = parse_or(&lookup, "ADMIN_LOCAL_ONLY", true)?;

        // Request timeout (default 30 seconds)
        let request_timeout_secs = positive_secs(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        // Metrics
        let metrics_enabled = lookup("METRICS_ENABLED")
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        // Build auth config
        let auth = AuthConfig::try_new(secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_access_lifetime(Duration::from_secs(access_secs))
            .with_refresh_lifetime(Duration::from_secs(refresh_secs))
            .with_compaction_interval(Duration::from_secs(compaction_secs));

        Ok(Self {
            http_port,
            auth,
            login,
            admin,
            admin_local_only,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn positive_secs<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, key, default)? {
        0 => Err(ConfigError::Invalid(key)),
        secs => Ok(secs),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
