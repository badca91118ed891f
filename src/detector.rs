use std::path::Path;

use crate::models::SourceKind;

/// Auto-detect artifact sources by scanning for known inventory files.
pub fn detect_sources(path: &Path) -> Vec<SourceKind> {
    let mut sources = Vec::new();

    if path.join("expiry.toml").is_file() {
        sources.push(SourceKind::Manifest);
    }

    if path.join("artifacts.json").is_file() {
        sources.push(SourceKind::Json);
    }

    if path.join("scans").is_dir() {
        sources.push(SourceKind::Scan);
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detects_each_source() {
        let dir = TempDir::new().unwrap();
        assert!(detect_sources(dir.path()).is_empty());

        std::fs::write(dir.path().join("expiry.toml"), "").unwrap();
        std::fs::write(dir.path().join("artifacts.json"), "[]").unwrap();
        std::fs::create_dir(dir.path().join("scans")).unwrap();

        assert_eq!(
            detect_sources(dir.path()),
            vec![SourceKind::Manifest, SourceKind::Json, SourceKind::Scan]
        );
    }

    #[test]
    fn test_scans_file_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scans"), "not a dir").unwrap();
        assert!(detect_sources(dir.path()).is_empty());
    }
}
