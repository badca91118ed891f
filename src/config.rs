use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{Artifact, ExpiryState, PolicyVerdict, SourceKind};

/// Collection-level "expiring soon" window, in days.
pub const COLLECTION_WINDOW_DAYS: i64 = 30;

/// Per-card countdown window, in days.
pub const COUNTDOWN_WINDOW_DAYS: i64 = 15;

/// Assumed total lifetime of a certificate, in days, for renewal progress.
pub const CERTIFICATE_LIFETIME_DAYS: i64 = 365;

/// Scanned dates below this confidence need a human to confirm them.
pub const MIN_CONFIDENCE: f64 = 0.6;

/// Root configuration structure, deserialized from `.expiry-checkr/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Classification windows. Every field falls back to its named constant.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub collection_window_days: i64,
    pub countdown_window_days: i64,
    pub certificate_lifetime_days: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            collection_window_days: COLLECTION_WINDOW_DAYS,
            countdown_window_days: COUNTDOWN_WINDOW_DAYS,
            certificate_lifetime_days: CERTIFICATE_LIFETIME_DAYS,
        }
    }
}

/// Maps each expiry state to the action the scan should take.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub valid: PolicyAction,
    pub expiring_soon: PolicyAction,
    pub expired: PolicyAction,
    /// No expiry date could be determined.
    pub unresolved: PolicyAction,
    /// Scanned dates below this confidence are at least a warning.
    pub min_confidence: f64,
}

impl Default for PolicyConfig {
    /// Valid artifacts pass, expiring ones warn, expired ones fail the scan.
    fn default() -> Self {
        PolicyConfig {
            valid: PolicyAction::Pass,
            expiring_soon: PolicyAction::Warn,
            expired: PolicyAction::Error,
            unresolved: PolicyAction::Warn,
            min_confidence: MIN_CONFIDENCE,
        }
    }
}

/// The action to take for an artifact in a given state.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    /// Nothing to do.
    Pass,
    /// Needs attention but does not fail the scan.
    Warn,
    /// Fails the scan; the CLI exits with code 1.
    Error,
}

impl PolicyAction {
    /// Convert to the corresponding [`PolicyVerdict`].
    pub fn to_verdict(&self) -> PolicyVerdict {
        match self {
            PolicyAction::Pass => PolicyVerdict::Pass,
            PolicyAction::Warn => PolicyVerdict::Warn,
            PolicyAction::Error => PolicyVerdict::Error,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.expiry-checkr/config.toml`
/// 3. `~/.config/expiry-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".expiry-checkr").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("expiry-checkr")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

/// Determine the policy verdict for an enriched artifact.
///
/// The state's action applies first; a scanned date below `min_confidence` is
/// raised to at least a warning so a human confirms it.
pub fn apply_policy(config: &Config, artifact: &Artifact) -> PolicyVerdict {
    let policy = &config.policy;

    let verdict = match artifact.status.as_ref().map(|s| s.state) {
        Some(ExpiryState::Valid) => policy.valid.to_verdict(),
        Some(ExpiryState::ExpiringSoon) => policy.expiring_soon.to_verdict(),
        Some(ExpiryState::Expired) => policy.expired.to_verdict(),
        None => policy.unresolved.to_verdict(),
    };

    if needs_confirmation(config, artifact) && verdict == PolicyVerdict::Pass {
        return PolicyVerdict::Warn;
    }
    verdict
}

/// A scanned artifact whose extracted date is not trustworthy enough on its own.
pub fn needs_confirmation(config: &Config, artifact: &Artifact) -> bool {
    artifact.source == SourceKind::Scan
        && artifact
            .confidence
            .is_some_and(|c| c < config.policy.min_confidence)
}
