use std::path::Path;

use anyhow::{Context, Result};

use crate::date::normalizer::DateNormalizer;
use crate::inventory::ArtifactRecord;
use crate::models::{Artifact, SourceKind};

/// Loads a JSON array of artifact records from `artifacts.json`, the shape a
/// storage export hands over.
pub struct JsonLoader<'a> {
    normalizer: &'a DateNormalizer,
}

impl<'a> JsonLoader<'a> {
    pub fn new(normalizer: &'a DateNormalizer) -> Self {
        Self { normalizer }
    }
}

impl super::Loader for JsonLoader<'_> {
    fn load(&self, path: &Path) -> Result<Vec<Artifact>> {
        let json_path = path.join("artifacts.json");
        if !json_path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&json_path)
            .with_context(|| format!("Failed to read {}", json_path.display()))?;
        let records: Vec<ArtifactRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid artifact list {}", json_path.display()))?;

        Ok(records
            .into_iter()
            .map(|r| r.into_artifact(self.normalizer, SourceKind::Json))
            .collect())
    }
}
