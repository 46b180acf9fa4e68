//! Millisecond timestamps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Point in time as milliseconds since the unix epoch.
///
/// Token claims, the revocation cutoff and the clock all speak this unit,
/// so comparisons never mix precisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Build from milliseconds since the epoch
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the epoch
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Add a duration, saturating at the representable maximum
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Time remaining until `later`, zero if `later` is not after `self`
    pub fn until(self, later: Timestamp) -> Duration {
        u64::try_from(later.0.saturating_sub(self.0))
            .map(Duration::from_millis)
            .unwrap_or(Duration::ZERO)
    }

    /// Convert to a chrono datetime (None if out of chrono's range)
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}
