//! Claimability oracle
//!
//! Pure functions of a switch record and the current time. Safe to call on
//! stale snapshots.

use chrono::{DateTime, Utc};
use heirswitch_types::{elapsed_secs, ClaimRejection, Switch, SwitchStatus};

/// Why `record` cannot be claimed at `now`, ignoring who is asking
pub fn claim_readiness(record: &Switch, now: DateTime<Utc>) -> Result<(), ClaimRejection> {
    if record.is_claimed {
        return Err(ClaimRejection::AlreadyClaimed);
    }
    if !record.is_active {
        return Err(ClaimRejection::Inactive);
    }

    let elapsed = elapsed_secs(record.last_check_in, now);
    let timeout = record.timeout_period.as_secs();
    if elapsed < timeout {
        return Err(ClaimRejection::TimeoutNotElapsed {
            remaining_secs: timeout - elapsed,
        });
    }
    Ok(())
}

/// Active, unclaimed, and `timeout_period` elapsed since the last check-in
pub fn is_claimable(record: &Switch, now: DateTime<Utc>) -> bool {
    claim_readiness(record, now).is_ok()
}

/// Seconds until the switch becomes claimable; `None` unless active
pub fn secs_until_claimable(record: &Switch, now: DateTime<Utc>) -> Option<u64> {
    match claim_readiness(record, now) {
        Ok(()) => Some(0),
        Err(ClaimRejection::TimeoutNotElapsed { remaining_secs }) => Some(remaining_secs),
        Err(_) => None,
    }
}

pub fn status(record: Option<&Switch>, now: DateTime<Utc>) -> SwitchStatus {
    match record {
        None => SwitchStatus::None,
        Some(r) if r.is_claimed => SwitchStatus::Claimed,
        Some(r) if !r.is_active => SwitchStatus::Cancelled,
        Some(r) if is_claimable(r, now) => SwitchStatus::Claimable,
        Some(_) => SwitchStatus::Active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use heirswitch_types::{Address, Amount, TimeoutPeriod};

    fn record(timeout_secs: u64, now: DateTime<Utc>) -> Switch {
        Switch::new(
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            Amount::new(10),
            TimeoutPeriod::from_secs(timeout_secs),
            now,
        )
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let t0 = Utc::now();
        let sw = record(100, t0);

        assert!(!is_claimable(&sw, t0 + Duration::seconds(99)));
        assert!(is_claimable(&sw, t0 + Duration::seconds(100)));
    }

    #[test]
    fn test_subsecond_does_not_count() {
        let t0 = Utc::now();
        let sw = record(100, t0);
        assert!(!is_claimable(&sw, t0 + Duration::milliseconds(99_999)));
    }

    #[test]
    fn test_terminal_records_never_claimable() {
        let t0 = Utc::now();
        let far = t0 + Duration::days(10_000);

        let mut cancelled = record(1, t0);
        cancelled.is_active = false;
        assert_eq!(claim_readiness(&cancelled, far), Err(ClaimRejection::Inactive));

        let mut claimed = record(1, t0);
        claimed.is_active = false;
        claimed.is_claimed = true;
        assert_eq!(claim_readiness(&claimed, far), Err(ClaimRejection::AlreadyClaimed));
    }

    #[test]
    fn test_remaining_secs() {
        let t0 = Utc::now();
        let sw = record(100, t0);
        assert_eq!(secs_until_claimable(&sw, t0 + Duration::seconds(40)), Some(60));
        assert_eq!(secs_until_claimable(&sw, t0 + Duration::seconds(400)), Some(0));
    }

    #[test]
    fn test_status() {
        let t0 = Utc::now();
        let sw = record(100, t0);
        assert_eq!(status(None, t0), SwitchStatus::None);
        assert_eq!(status(Some(&sw), t0), SwitchStatus::Active);
        assert_eq!(status(Some(&sw), t0 + Duration::seconds(100)), SwitchStatus::Claimable);

        let mut claimed = sw.clone();
        claimed.is_active = false;
        claimed.is_claimed = true;
        assert_eq!(status(Some(&claimed), t0), SwitchStatus::Claimed);
    }
}
