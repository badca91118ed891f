use chrono::{DateTime, Utc};

use crate::models::{ExpiryState, ExpiryStatus};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Whole days until `expiry`, rounded up. 23 hours left counts as 1 day.
pub fn days_until_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expiry - now).num_milliseconds();
    (millis as f64 / MILLIS_PER_DAY).ceil() as i64
}

/// Classify `expiry` relative to `now`.
///
/// - `Expired` once `now` is strictly past `expiry`
/// - `ExpiringSoon` when at most `window_days` remain
/// - `Valid` otherwise
pub fn classify(expiry: DateTime<Utc>, now: DateTime<Utc>, window_days: i64) -> ExpiryStatus {
    let days = days_until_expiry(expiry, now);

    let state = if now > expiry {
        ExpiryState::Expired
    } else if days <= window_days {
        ExpiryState::ExpiringSoon
    } else {
        ExpiryState::Valid
    };

    ExpiryStatus {
        state,
        days_until_expiry: days,
        progress_percentage: None,
    }
}

/// Like [`classify`], also filling `progress_percentage` for an artifact that
/// lives `total_days` in total. A non-positive lifetime leaves progress unset.
pub fn classify_with_lifetime(
    expiry: DateTime<Utc>,
    now: DateTime<Utc>,
    window_days: i64,
    total_days: i64,
) -> ExpiryStatus {
    let mut status = classify(expiry, now, window_days);
    if total_days > 0 {
        status.progress_percentage = Some(progress_percentage(status.days_until_expiry, total_days));
    }
    status
}

/// Share of the lifetime already used, clamped to `[0, 100]`.
pub fn progress_percentage(days_until_expiry: i64, total_days: i64) -> f64 {
    let total = total_days as f64;
    ((total - days_until_expiry as f64) / total * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_boundary() {
        let at_window = classify(now() + Duration::days(30), now(), 30);
        assert_eq!(at_window.state, ExpiryState::ExpiringSoon);
        assert_eq!(at_window.days_until_expiry, 30);

        let past_window = classify(now() + Duration::days(31), now(), 30);
        assert_eq!(past_window.state, ExpiryState::Valid);
        assert_eq!(past_window.days_until_expiry, 31);
    }

    #[test]
    fn test_one_second_overdue() {
        let status = classify(now() - Duration::seconds(1), now(), 30);
        assert_eq!(status.state, ExpiryState::Expired);
        assert!(status.days_until_expiry <= 0);
    }

    #[test]
    fn test_expiring_now_is_not_expired() {
        let status = classify(now(), now(), 30);
        assert_eq!(status.state, ExpiryState::ExpiringSoon);
        assert_eq!(status.days_until_expiry, 0);
    }

    #[test]
    fn test_partial_days_round_up() {
        assert_eq!(days_until_expiry(now() + Duration::hours(23), now()), 1);
        assert_eq!(days_until_expiry(now() + Duration::minutes(1), now()), 1);
        assert_eq!(days_until_expiry(now() + Duration::hours(25), now()), 2);
        assert_eq!(days_until_expiry(now() - Duration::hours(25), now()), -1);
        assert_eq!(days_until_expiry(now() - Duration::days(3), now()), -3);
    }

    #[test]
    fn test_countdown_window() {
        let status = classify(now() + Duration::days(16), now(), 15);
        assert_eq!(status.state, ExpiryState::Valid);
        let status = classify(now() + Duration::days(15), now(), 15);
        assert_eq!(status.state, ExpiryState::ExpiringSoon);
    }

    #[test]
    fn test_progress_endpoints() {
        assert_eq!(progress_percentage(365, 365), 0.0);
        assert_eq!(progress_percentage(0, 365), 100.0);
        assert_eq!(progress_percentage(730, 365), 0.0);
        assert_eq!(progress_percentage(-12, 365), 100.0);
        assert!((progress_percentage(73, 365) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_monotonic_as_expiry_nears() {
        let mut previous = progress_percentage(365, 365);
        for days in (0..365).rev() {
            let current = progress_percentage(days, 365);
            assert!(current >= previous, "{days}: {current} < {previous}");
            previous = current;
        }
    }

    #[test]
    fn test_lifetime_fills_progress() {
        let status = classify_with_lifetime(now() + Duration::days(10), now(), 15, 365);
        assert_eq!(status.state, ExpiryState::ExpiringSoon);
        let progress = status.progress_percentage.unwrap();
        assert!(progress > 97.0 && progress < 98.0);

        let no_lifetime = classify_with_lifetime(now() + Duration::days(10), now(), 15, 0);
        assert_eq!(no_lifetime.progress_percentage, None);
    }
}
