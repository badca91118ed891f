use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::extract::extractor::ExpiryExtractor;
use crate::models::{Artifact, ArtifactKind, SourceKind};

/// Whole words that mark a scanned document as a certificate.
const CERTIFICATE_WORDS: &str = r"\b(?:certificat\w*|ssl|tls)\b";

/// Loads `scans/*.txt`, the text an upstream OCR step produced for each
/// scanned document, and extracts an expiry date from each.
pub struct ScanLoader<'a> {
    extractor: &'a ExpiryExtractor,
    certificate_words: Regex,
    now: DateTime<Utc>,
    quiet: bool,
}

impl<'a> ScanLoader<'a> {
    pub fn new(extractor: &'a ExpiryExtractor, now: DateTime<Utc>, quiet: bool) -> Result<Self> {
        let certificate_words = RegexBuilder::new(CERTIFICATE_WORDS)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            extractor,
            certificate_words,
            now,
            quiet,
        })
    }

    /// Certificates mention themselves; anything else is treated as a subscription.
    pub fn infer_kind(&self, text: &str) -> ArtifactKind {
        if self.certificate_words.is_match(text) {
            ArtifactKind::Certificate
        } else {
            ArtifactKind::Subscription
        }
    }

    /// Turn one scanned text file into an artifact named after the file stem.
    ///
    /// When no date can be extracted the artifact is returned unresolved, with
    /// no confidence, for manual entry.
    pub fn scan_file(&self, file: &Path) -> Result<Artifact> {
        let text = read_scan(file)?;
        let result = self.extractor.extract(&text, self.now);

        let name = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed scan")
            .to_string();

        let mut artifact = Artifact::new(name, self.infer_kind(&text), SourceKind::Scan);
        artifact.notes = file.file_name().and_then(|n| n.to_str()).map(str::to_string);

        if result.is_present() {
            debug!(file = %file.display(), confidence = result.confidence, "scan resolved");
            artifact.expires = result.date;
            artifact.confidence = Some(result.confidence);
        } else {
            warn!(file = %file.display(), "no expiry date found in scan, needs manual entry");
        }

        Ok(artifact)
    }
}

impl super::Loader for ScanLoader<'_> {
    fn load(&self, path: &Path) -> Result<Vec<Artifact>> {
        let dir = path.join("scans");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
            })
            .collect();
        files.sort();

        let pb = if !self.quiet {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut artifacts = Vec::with_capacity(files.len());
        for file in &files {
            artifacts.push(self.scan_file(file)?);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(artifacts)
    }
}

/// Read a scan as text. OCR output is often not clean UTF-8, so invalid
/// sequences are replaced rather than rejected.
pub fn read_scan(file: &Path) -> Result<String> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Loader;
    use chrono::{Datelike, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_scan_directory() {
        let dir = TempDir::new().unwrap();
        let scans = dir.path().join("scans");
        std::fs::create_dir(&scans).unwrap();
        std::fs::write(
            scans.join("first-aid.txt"),
            "RED CROSS\nCertificate of Completion\nExpiry Date: 12/31/2026\n",
        )
        .unwrap();
        std::fs::write(scans.join("gym.txt"), "Monthly plan\nThank you for your payment").unwrap();
        std::fs::write(scans.join("photo.png"), [0u8, 1, 2]).unwrap();

        let extractor = ExpiryExtractor::new().unwrap();
        let artifacts = ScanLoader::new(&extractor, now(), true).unwrap().load(dir.path()).unwrap();
        assert_eq!(artifacts.len(), 2);

        let cert = &artifacts[0];
        assert_eq!(cert.name, "first-aid");
        assert_eq!(cert.kind, ArtifactKind::Certificate);
        assert_eq!(cert.expires.map(|d| d.year()), Some(2026));
        assert!(cert.confidence.unwrap() >= 0.8);

        let gym = &artifacts[1];
        assert_eq!(gym.kind, ArtifactKind::Subscription);
        assert!(gym.expires.is_none());
        assert!(gym.confidence.is_none());
        assert_eq!(gym.notes.as_deref(), Some("gym.txt"));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("noisy.txt");
        let mut bytes = b"Valid until: 2027-02-01 ".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        std::fs::write(&file, bytes).unwrap();

        let extractor = ExpiryExtractor::new().unwrap();
        let artifact = ScanLoader::new(&extractor, now(), true).unwrap().scan_file(&file).unwrap();
        assert_eq!(artifact.expires.map(|d| d.month()), Some(2));
    }

    #[test]
    fn test_infer_kind() {
        let extractor = ExpiryExtractor::new().unwrap();
        let loader = ScanLoader::new(&extractor, now(), true).unwrap();
        let cases = [
            ("SSL Certificate for example.com", ArtifactKind::Certificate),
            ("CERTIFICATION OF TRAINING", ArtifactKind::Certificate),
            ("tls: example.org", ArtifactKind::Certificate),
            ("Netflix Premium", ArtifactKind::Subscription),
            (
                "Spotify Premium - hassle-free monthly plan. Renews automatically.",
                ArtifactKind::Subscription,
            ),
            ("Atlas subscription, 3 titles included", ArtifactKind::Subscription),
        ];
        for (text, expected) in cases {
            assert_eq!(loader.infer_kind(text), expected, "{text}");
        }
    }
}
