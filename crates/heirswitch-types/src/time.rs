//! Timeout periods and elapsed-time helpers
//!
//! All comparisons happen in whole seconds; sub-second precision of the
//! clock is never relied upon.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Inactivity period after which a switch becomes claimable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeoutPeriod(u64);

impl TimeoutPeriod {
    /// 180 days, the period used when a caller does not choose one
    pub const DEFAULT: TimeoutPeriod = TimeoutPeriod(180 * SECS_PER_DAY);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn from_days(days: u64) -> Self {
        Self(days * SECS_PER_DAY)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Saturates at the largest representable duration
    pub fn as_duration(&self) -> Duration {
        i64::try_from(self.0)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or_else(|| Duration::milliseconds(i64::MAX))
    }
}

impl Default for TimeoutPeriod {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TimeoutPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Whole seconds from `since` to `now`, clamped at zero
pub fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - since).num_seconds()).unwrap_or(0)
}
