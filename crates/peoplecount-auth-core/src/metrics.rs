//! Auth metrics.
//!
//! # Metrics
//!
//! - `auth_tokens_issued_total` - Counter of minted tokens by kind
//! - `auth_token_checks_total` - Counter of token checks by outcome
//! - `auth_logins_total` - Counter of login attempts by outcome
//! - `auth_revocations_total` - Counter of newly revoked tokens
//! - `auth_policy_changes_total` - Counter of applied policy changes
//! - `auth_revoked_tokens` - Gauge of entries held by the revocation registry
//!
//! Nothing is exported unless a `metrics` recorder is installed.

use metrics::{counter, gauge};
use peoplecount_types::TokenKind;

use crate::AuthError;

/// Metric name for minted tokens.
pub const TOKENS_ISSUED_TOTAL: &str = "auth_tokens_issued_total";

/// Metric name for token checks.
pub const TOKEN_CHECKS_TOTAL: &str = "auth_token_checks_total";

/// Metric name for login attempts.
pub const LOGINS_TOTAL: &str = "auth_logins_total";

/// Metric name for revocations.
pub const REVOCATIONS_TOTAL: &str = "auth_revocations_total";

/// Metric name for policy changes.
pub const POLICY_CHANGES_TOTAL: &str = "auth_policy_changes_total";

/// Metric name for the revocation registry size.
pub const REVOKED_TOKENS: &str = "auth_revoked_tokens";

pub(crate) fn record_issued(kind: TokenKind) {
    counter!(TOKENS_ISSUED_TOTAL, "kind" => kind.as_str()).increment(1);
}

/// Record a token check: `"ok"` or the error's diagnostic label.
pub(crate) fn record_check(result: Result<(), &AuthError>) {
    let outcome = match result {
        Ok(()) => "ok",
        Err(e) => e.diagnostic(),
    };
    counter!(TOKEN_CHECKS_TOTAL, "outcome" => outcome).increment(1);
}

pub(crate) fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(LOGINS_TOTAL, "outcome" => outcome).increment(1);
}

pub(crate) fn record_revocation(registry_size: usize) {
    counter!(REVOCATIONS_TOTAL).increment(1);
    record_registry_size(registry_size);
}

pub(crate) fn record_registry_size(registry_size: usize) {
    gauge!(REVOKED_TOKENS).set(registry_size as f64);
}

pub(crate) fn record_policy_change() {
    counter!(POLICY_CHANGES_TOTAL).increment(1);
}
