//! Mock collaborators and gateway setup

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use dashmap::DashMap;
use peoplecount_auth_core::{
    AdminAuthorizer, AdminCredentials, AuthConfig, AuthError, AuthGateway, CredentialVerifier,
    ManualClock,
};
use peoplecount_types::Timestamp;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const SECRET: &str = "test-secret-test-secret-test-secret!";

/// In-memory username -> password verifier
#[derive(Default, Clone)]
pub struct MockCredentialVerifier {
    users: Arc<DashMap<String, String>>,
    calls: Arc<AtomicUsize>,
}

impl MockCredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user
    pub fn insert_user(&self, username: &str, password: &str) {
        self.users.insert(username.to_string(), password.to_string());
    }

    /// Number of verify calls made
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialVerifier for MockCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .users
            .get(username)
            .is_some_and(|stored| stored.value() == password))
    }
}

/// Admin authorizer accepting one fixed password
#[derive(Clone)]
pub struct MockAdminAuthorizer {
    password: String,
}

impl MockAdminAuthorizer {
    pub fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
        }
    }
}

#[async_trait]
impl AdminAuthorizer for MockAdminAuthorizer {
    async fn authorize(&self, credentials: &AdminCredentials) -> Result<(), AuthError> {
        if credentials.password == self.password {
            Ok(())
        } else {
            Err(AuthError::AdminAuthFailed)
        }
    }
}

/// Gateway wired to mocks and a manual clock
pub struct TestGateway {
    pub gateway: AuthGateway,
    pub clock: ManualClock,
    #[allow(dead_code)]
    pub verifier: MockCredentialVerifier,
}

/// Gateway with user `AdminHS`/`Secret123`, admin password `root-pw`,
/// default lifetimes and the clock at t = 1_700_000_000_000 ms
pub fn test_gateway() -> TestGateway {
    let clock = ManualClock::new(Timestamp::from_millis(1_700_000_000_000));
    let verifier = MockCredentialVerifier::new();
    verifier.insert_user("AdminHS", "Secret123");

    let gateway = AuthGateway::new(
        &AuthConfig::new(SECRET),
        Arc::new(verifier.clone()),
        Arc::new(MockAdminAuthorizer::new("root-pw")),
        Arc::new(clock.clone()),
    )
    .expect("gateway");

    TestGateway {
        gateway,
        clock,
        verifier,
    }
}

/// Low-cost Argon2id PHC hash for tests
#[allow(dead_code)]
pub fn cheap_hash(password: &str) -> String {
    let argon2 = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(8, 1, 1, None).expect("params"),
    );
    let salt = SaltString::encode_b64(b"integration-salt").expect("salt");
    argon2
        .hash_password(password.as_bytes(), &salt)
        .expect("hash")
        .to_string()
}
