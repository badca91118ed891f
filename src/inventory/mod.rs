use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

use crate::date::normalizer::DateNormalizer;
use crate::models::{Artifact, ArtifactKind, SourceKind};

pub mod json;
pub mod manifest;
pub mod scan;

/// Reads raw artifact records from one kind of inventory source.
pub trait Loader {
    fn load(&self, path: &Path) -> Result<Vec<Artifact>>;
}

/// An artifact as stored, before its derived fields are computed.
#[derive(Debug, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub kind: ArtifactKind,
    /// Any layout the [`DateNormalizer`] accepts.
    pub expires: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ArtifactRecord {
    /// Convert to an [`Artifact`]. An unparseable `expires` leaves the artifact
    /// unresolved rather than failing the whole load.
    pub fn into_artifact(self, normalizer: &DateNormalizer, source: SourceKind) -> Artifact {
        let expires = normalizer.parse(&self.expires);
        if expires.is_none() {
            warn!(artifact = %self.name, expires = %self.expires, "unrecognised expiry date, needs manual entry");
        }

        let mut artifact = Artifact::new(self.name, self.kind, source);
        artifact.expires = expires;
        artifact.notes = self.notes;
        artifact
    }
}
