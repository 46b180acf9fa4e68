//! Common test utilities for peoplecount-auth-core integration tests

pub mod mocks;

#[allow(unused_imports)]
pub use mocks::{cheap_hash, test_gateway, MockAdminAuthorizer, MockCredentialVerifier, TestGateway};
