//! Credential verification against an opaque salted password hash

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use uuid::Uuid;

use crate::crypto::constant_time_eq;
use crate::AuthError;

/// Checks a submitted username/password pair.
///
/// Implementations must not reveal which of the two fields was wrong.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns `Ok(true)` when the pair matches a known identity
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError>;
}

/// Single configured identity with an Argon2 PHC-string password hash
#[derive(Clone)]
pub struct StaticCredentialVerifier {
    username: String,
    password_hash: String,
}

impl StaticCredentialVerifier {
    /// Create a verifier, rejecting hashes that are not valid PHC strings
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let username = username.into();
        let password_hash = password_hash.into();
        if username.is_empty() {
            return Err(AuthError::Configuration("username must not be empty".to_string()));
        }
        PasswordHash::new(&password_hash)
            .map_err(|e| AuthError::Configuration(format!("invalid password hash: {e}")))?;
        Ok(Self {
            username,
            password_hash,
        })
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let username_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());

        // Always pay for the hash check so timing does not reveal the username
        let hash = self.password_hash.clone();
        let password = password.to_owned();
        let password_ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!("Password verification task failed: {}", e);
                AuthError::Internal("password verification failed".to_string())
            })?;

        Ok(username_ok && password_ok)
    }
}

impl std::fmt::Debug for StaticCredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialVerifier")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Verify a password against a PHC-string hash
fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Hash a password into an Argon2id PHC string with a random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::Internal(format!("salt encoding failed: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
}
