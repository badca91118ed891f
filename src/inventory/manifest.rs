use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::date::normalizer::DateNormalizer;
use crate::inventory::ArtifactRecord;
use crate::models::{Artifact, SourceKind};

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, rename = "artifact")]
    artifacts: Vec<ArtifactRecord>,
}

/// Loads `[[artifact]]` tables from `expiry.toml`.
pub struct ManifestLoader<'a> {
    normalizer: &'a DateNormalizer,
}

impl<'a> ManifestLoader<'a> {
    pub fn new(normalizer: &'a DateNormalizer) -> Self {
        Self { normalizer }
    }
}

impl super::Loader for ManifestLoader<'_> {
    fn load(&self, path: &Path) -> Result<Vec<Artifact>> {
        let manifest_path = path.join("expiry.toml");
        if !manifest_path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        let manifest: Manifest = toml::from_str(&content)
            .with_context(|| format!("Invalid manifest {}", manifest_path.display()))?;

        Ok(manifest
            .artifacts
            .into_iter()
            .map(|r| r.into_artifact(self.normalizer, SourceKind::Manifest))
            .collect())
    }
}
