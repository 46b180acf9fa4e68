//! Authentication context types.

use peoplecount_auth_core::Admission;
use peoplecount_types::{Timestamp, TokenId};

/// Identity of an admitted request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated subject.
    pub subject: String,
    /// Identifier of the access token presented.
    pub token_id: TokenId,
    /// When that token expires.
    pub expires_at: Timestamp,
}

impl From<Admission> for AuthContext {
    fn from(admission: Admission) -> Self {
        Self {
            subject: admission.subject,
            token_id: admission.token_id,
            expires_at: admission.expires_at,
        }
    }
}
