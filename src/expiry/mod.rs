//! Expiry status derivation.
//!
//! - [`classifier`]: pure `classify` over an expiry instant and an explicit `now`.
//! - [`enrich`]: fills the derived fields of an [`Artifact`] on every load, the way
//!   the storage layer enriches records on read.

pub mod classifier;

use chrono::{DateTime, Utc};

use crate::config::Thresholds;
use crate::models::{Artifact, ArtifactKind};

use classifier::{classify, classify_with_lifetime};

/// Recompute `status` and, for certificates, `countdown` from `expires` and `now`.
///
/// Unresolved artifacts (no expiry date) get neither.
pub fn enrich(artifact: &mut Artifact, thresholds: &Thresholds, now: DateTime<Utc>) {
    let Some(expires) = artifact.expires else {
        artifact.status = None;
        artifact.countdown = None;
        return;
    };

    artifact.status = Some(classify(expires, now, thresholds.collection_window_days));
    artifact.countdown = match artifact.kind {
        ArtifactKind::Certificate => Some(classify_with_lifetime(
            expires,
            now,
            thresholds.countdown_window_days,
            thresholds.certificate_lifetime_days,
        )),
        ArtifactKind::Subscription => None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpiryState, SourceKind};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_certificate_gets_both_windows() {
        let mut cert = Artifact::new("api.example.com".into(), ArtifactKind::Certificate, SourceKind::Manifest);
        cert.expires = Some(now() + Duration::days(20));
        enrich(&mut cert, &Thresholds::default(), now());

        let status = cert.status.unwrap();
        assert_eq!(status.state, ExpiryState::ExpiringSoon);
        assert_eq!(status.progress_percentage, None);

        let countdown = cert.countdown.unwrap();
        assert_eq!(countdown.state, ExpiryState::Valid);
        assert_eq!(countdown.days_until_expiry, 20);
        assert!(countdown.progress_percentage.is_some());
    }

    #[test]
    fn test_subscription_has_no_countdown() {
        let mut sub = Artifact::new("Figma".into(), ArtifactKind::Subscription, SourceKind::Json);
        sub.expires = Some(now() - Duration::days(3));
        enrich(&mut sub, &Thresholds::default(), now());
        assert_eq!(sub.status.unwrap().state, ExpiryState::Expired);
        assert!(sub.countdown.is_none());
    }

    #[test]
    fn test_unresolved_is_cleared() {
        let mut scan = Artifact::new("receipt".into(), ArtifactKind::Subscription, SourceKind::Scan);
        scan.status = Some(classify(now(), now(), 30));
        enrich(&mut scan, &Thresholds::default(), now());
        assert!(scan.status.is_none());
        assert!(scan.countdown.is_none());
    }
}
