use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked artifact, enriched with its derived expiry fields on every load.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub name: String,
    pub kind: ArtifactKind,
    /// `None` when the expiry date could not be determined and needs manual entry.
    pub expires: Option<DateTime<Utc>>,
    pub source: SourceKind,
    /// Extraction confidence, only set for artifacts read from scanned text.
    pub confidence: Option<f64>,
    pub notes: Option<String>,
    /// Collection-level status (subscription-sized window).
    pub status: Option<ExpiryStatus>,
    /// Per-card countdown with renewal progress; certificates only.
    pub countdown: Option<ExpiryStatus>,
    pub verdict: PolicyVerdict,
}

impl Artifact {
    pub fn new(name: String, kind: ArtifactKind, source: SourceKind) -> Self {
        Artifact {
            name,
            kind,
            expires: None,
            source,
            confidence: None,
            notes: None,
            status: None,
            countdown: None,
            verdict: PolicyVerdict::Warn,
        }
    }

    /// State used for grouping in reports; unresolved artifacts have no status.
    pub fn state_label(&self) -> String {
        match &self.status {
            Some(status) => status.state.to_string(),
            None => "Unresolved".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Certificate,
    Subscription,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Certificate => write!(f, "Certificate"),
            ArtifactKind::Subscription => write!(f, "Subscription"),
        }
    }
}

/// Where an artifact record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `expiry.toml`
    Manifest,
    /// `artifacts.json`
    Json,
    /// `scans/*.txt`
    Scan,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Manifest => write!(f, "manifest"),
            SourceKind::Json => write!(f, "json"),
            SourceKind::Scan => write!(f, "scan"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryState {
    Expired,
    ExpiringSoon,
    Valid,
}

impl std::fmt::Display for ExpiryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpiryState::Expired => write!(f, "Expired"),
            ExpiryState::ExpiringSoon => write!(f, "Expiring Soon"),
            ExpiryState::Valid => write!(f, "Valid"),
        }
    }
}

/// Derived expiry fields. Recomputed on every read, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiryStatus {
    pub state: ExpiryState,
    /// Whole days until expiry, rounded up; negative when overdue.
    pub days_until_expiry: i64,
    /// Renewal progress in `[0, 100]`, only for artifacts with an assumed lifetime.
    pub progress_percentage: Option<f64>,
}

/// Semantic group of an extraction pattern, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternGroup {
    /// `expiry|expires|valid` label, optional qualifier, then a colon.
    Labeled,
    /// `valid until|through|thru`.
    ValidUntil,
    /// Any `expir*` word somewhere before a date-shaped token.
    Loose,
}

impl std::fmt::Display for PatternGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternGroup::Labeled => write!(f, "labeled"),
            PatternGroup::ValidUntil => write!(f, "valid-until"),
            PatternGroup::Loose => write!(f, "loose"),
        }
    }
}

/// A substring matched by one extraction pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct DateCandidate {
    /// The captured date span handed to the normalizer.
    pub text: String,
    /// The full matched text, label included; phrase bonuses are scored on this.
    pub matched: String,
    /// Index of the originating pattern in the pattern table.
    pub pattern: usize,
    pub group: PatternGroup,
}

/// Outcome of one extraction call. `confidence` is 0 iff `date` is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub date: Option<DateTime<Utc>>,
    pub confidence: f64,
}

impl ExtractionResult {
    pub fn absent() -> Self {
        ExtractionResult {
            date: None,
            confidence: 0.0,
        }
    }

    pub fn is_present(&self) -> bool {
        self.date.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PolicyVerdict {
    Pass,
    Warn,
    Error,
}

impl std::fmt::Display for PolicyVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyVerdict::Pass => write!(f, "pass"),
            PolicyVerdict::Warn => write!(f, "warn"),
            PolicyVerdict::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_artifact_json_shape() {
        let mut artifact = Artifact::new("api.example.com".into(), ArtifactKind::Certificate, SourceKind::Scan);
        artifact.expires = Some(Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap());
        artifact.status = Some(ExpiryStatus {
            state: ExpiryState::ExpiringSoon,
            days_until_expiry: 16,
            progress_percentage: None,
        });

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["kind"], "certificate");
        assert_eq!(json["source"], "scan");
        assert_eq!(json["status"]["state"], "expiring_soon");
        assert_eq!(json["verdict"], "Warn");
        assert!(json["countdown"].is_null());
    }
}
