//! `expiry-checkr`: track expiring certificates and subscriptions, and read expiry
//! dates out of scanned documents.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and install logging ([`telemetry`]).
//! 2. Resolve the evaluation instant (`--now`, else the wall clock).
//! 3. `--scan FILE`: extract one expiry date ([`extract`]) for confirmation, then exit.
//! 4. Load config ([`config::load_config`]).
//! 5. Auto-detect inventory sources ([`detector::detect_sources`]).
//! 6. Load artifacts from each source ([`inventory`]).
//! 7. Derive expiry status ([`expiry::enrich`]) and apply policy ([`config::apply_policy`]).
//! 8. Render the requested report ([`report`]).
//! 9. Exit `0` (clean) or `1` (at least one [`models::PolicyVerdict::Error`]).

mod cli;
mod config;
mod date;
mod detector;
mod expiry;
mod extract;
mod inventory;
mod models;
mod report;
mod telemetry;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use colored::Colorize;
use tracing::info;

use cli::{Cli, ReportFormat};
use config::{apply_policy, load_config};
use date::normalizer::DateNormalizer;
use detector::detect_sources;
use extract::extractor::ExpiryExtractor;
use inventory::Loader;
use models::{PolicyVerdict, SourceKind};

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    // Compiled once, shared by reference for the whole run
    let extractor = ExpiryExtractor::new()?;
    let now = resolve_now(cli.now.as_deref(), extractor.normalizer())?;

    if let Some(file) = &cli.scan {
        let text = inventory::scan::read_scan(file)?;
        let result = extractor.extract(&text, now);
        let candidates = if cli.explain {
            Some(extractor.candidates(&text))
        } else {
            None
        };
        report::terminal::render_extraction(
            file,
            &result,
            candidates.as_deref(),
            extractor.normalizer(),
            now,
        );
        if !result.is_present() {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let config = load_config(&path, cli.config.as_deref())?;

    // Detect sources (always automatic; --exclude-source opts out)
    let excluded: Vec<SourceKind> = cli.exclude_source.iter().map(Into::into).collect();

    let sources: Vec<SourceKind> = detect_sources(&path)
        .into_iter()
        .filter(|s| !excluded.contains(s))
        .collect();

    if sources.is_empty() {
        eprintln!(
            "No expiry.toml, artifacts.json or scans/ found in {}",
            path.display()
        );
        std::process::exit(1);
    }

    let mut artifacts = Vec::new();

    for source in &sources {
        let loaded = match source {
            SourceKind::Manifest => {
                inventory::manifest::ManifestLoader::new(extractor.normalizer()).load(&path)?
            }
            SourceKind::Json => {
                inventory::json::JsonLoader::new(extractor.normalizer()).load(&path)?
            }
            SourceKind::Scan => {
                inventory::scan::ScanLoader::new(&extractor, now, cli.quiet)?.load(&path)?
            }
        };

        info!(source = %source, count = loaded.len(), "loaded artifacts");
        if !cli.quiet {
            eprintln!("  {} {} {} artifacts", "→".cyan(), source, loaded.len());
        }

        artifacts.extend(loaded);
    }

    // Derived fields are recomputed on every run, never stored
    for artifact in &mut artifacts {
        expiry::enrich(artifact, &config.thresholds, now);
        artifact.verdict = apply_policy(&config, artifact);
    }

    // Resolve effective report format: --pdf implies PDF format
    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report,
    };
    let pdf_path = cli
        .pdf
        .unwrap_or_else(|| std::path::PathBuf::from("expiry-report.pdf"));

    match report_format {
        ReportFormat::Terminal => {
            report::terminal::render(&artifacts, &config, &path, now, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&artifacts)?);
        }
        ReportFormat::Pdf => {
            report::pdf::render(&artifacts, &path, &pdf_path, now)?;
        }
    }

    let has_errors = artifacts
        .iter()
        .any(|a| a.verdict == PolicyVerdict::Error);

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}

/// The evaluation instant: `--now` when given, otherwise the wall clock.
fn resolve_now(arg: Option<&str>, normalizer: &DateNormalizer) -> Result<DateTime<Utc>> {
    match arg {
        Some(raw) => match normalizer.parse(raw) {
            Some(now) => Ok(now),
            None => bail!("--now: unrecognised date '{raw}'"),
        },
        None => Ok(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_resolve_now_pinned() {
        let normalizer = DateNormalizer::new().unwrap();
        let now = resolve_now(Some("2026-10-16"), &normalizer).unwrap();
        assert_eq!((now.year(), now.month(), now.day()), (2026, 10, 16));
    }

    #[test]
    fn test_resolve_now_rejects_garbage() {
        let normalizer = DateNormalizer::new().unwrap();
        assert!(resolve_now(Some("yesterday"), &normalizer).is_err());
    }
}
