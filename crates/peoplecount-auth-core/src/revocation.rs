//! Revoked token identifiers and the issuance cutoff

use std::collections::HashMap;

use peoplecount_types::{Timestamp, TokenId};

/// Registry of individually revoked tokens plus a global cutoff.
///
/// Not synchronized; the gateway guards it together with the policy store.
#[derive(Debug, Default)]
pub struct RevocationRegistry {
    /// Revoked id -> that token's own expiry
    revoked: HashMap<TokenId, Timestamp>,
    /// Tokens issued strictly before this instant are no longer honored
    cutoff: Option<Timestamp>,
}

impl RevocationRegistry {
    /// Create an empty registry with no cutoff
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke a token. Returns false if it was already revoked.
    ///
    /// The first recorded expiry wins.
    pub fn revoke(&mut self, id: TokenId, expires_at: Timestamp) -> bool {
        match self.revoked.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(expires_at);
                true
            }
        }
    }

    /// Check if a token has been revoked
    pub fn is_revoked(&self, id: &TokenId) -> bool {
        self.revoked.contains_key(id)
    }

    /// Move the cutoff forward to `to`. Regressions are ignored.
    ///
    /// Returns true if the cutoff moved.
    pub fn advance_cutoff(&mut self, to: Timestamp) -> bool {
        match self.cutoff {
            Some(current) if to <= current => false,
            _ => {
                self.cutoff = Some(to);
                true
            }
        }
    }

    /// Whether a token issued at `issued_at` predates the cutoff (strict)
    pub fn is_before_cutoff(&self, issued_at: Timestamp) -> bool {
        self.cutoff.is_some_and(|cutoff| issued_at < cutoff)
    }

    /// Current cutoff, if one was ever set
    pub fn cutoff(&self) -> Option<Timestamp> {
        self.cutoff
    }

    /// Drop entries whose tokens have expired by `now`
    ///
    /// An expired token is rejected on expiry alone, so its entry is dead weight.
    pub fn compact(&mut self, now: Timestamp) -> usize {
        let before = self.revoked.len();
        self.revoked.retain(|_, expires_at| *expires_at > now);
        before - self.revoked.len()
    }

    /// Number of revoked entries held
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    /// True if nothing is revoked
    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}
