use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::config::{needs_confirmation, Config};
use crate::date::normalizer::DateNormalizer;
use crate::extract::extractor::is_plausible;
use crate::models::{Artifact, DateCandidate, ExpiryState, ExtractionResult, PolicyVerdict};

const BAR_WIDTH: usize = 12;

/// Render a colored terminal report.
pub fn render(
    artifacts: &[Artifact],
    config: &Config,
    path: &Path,
    now: DateTime<Utc>,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let total = artifacts.len();
    let pass_count = count(artifacts, &PolicyVerdict::Pass);
    let warn_count = count(artifacts, &PolicyVerdict::Warn);
    let error_count = count(artifacts, &PolicyVerdict::Error);

    if quiet {
        println!(
            "Total: {}  Pass: {}  Warn: {}  Error: {}",
            total,
            pass_count.to_string().green(),
            warn_count.to_string().yellow(),
            error_count.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "expiry-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Checking: {}", path.display());
    println!(" As of:    {}\n", now.format("%Y-%m-%d %H:%M UTC"));

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total artifacts : {}", total));
    println!(
        " │  {:<48} │",
        format!(
            "{}  Pass           : {:>4}  {}",
            "✓".green(),
            pass_count,
            summarize_states(artifacts, &PolicyVerdict::Pass)
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Warn           : {:>4}  {}",
            "⚠".yellow(),
            warn_count,
            summarize_states(artifacts, &PolicyVerdict::Warn)
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Error          : {:>4}  {}",
            "✗".red(),
            error_count,
            summarize_states(artifacts, &PolicyVerdict::Error)
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if error_count > 0 {
        println!(" {} Artifacts requiring renewal:\n", "[ERROR]".red().bold());
        render_table(artifacts, config, &PolicyVerdict::Error);
        println!();
    }

    if warn_count > 0 {
        println!(" {} Artifacts with warnings:\n", "[WARN]".yellow().bold());
        render_table(artifacts, config, &PolicyVerdict::Warn);
        println!();
    }

    if verbose && pass_count > 0 {
        println!(" {} All valid artifacts:\n", "[PASS]".green().bold());
        render_table(artifacts, config, &PolicyVerdict::Pass);
        println!();
    }

    Ok(())
}

fn render_table(artifacts: &[Artifact], config: &Config, verdict_filter: &PolicyVerdict) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Expires").add_attribute(Attribute::Bold),
            Cell::new("Days").add_attribute(Attribute::Bold),
            Cell::new("State").add_attribute(Attribute::Bold),
            Cell::new("Countdown").add_attribute(Attribute::Bold),
            Cell::new("Verdict").add_attribute(Attribute::Bold),
        ]);

    for artifact in artifacts.iter().filter(|a| &a.verdict == verdict_filter) {
        let (verdict_str, verdict_color) = match artifact.verdict {
            PolicyVerdict::Pass => ("✓ pass", Color::Green),
            PolicyVerdict::Warn => ("⚠ warn", Color::Yellow),
            PolicyVerdict::Error => ("✗ error", Color::Red),
        };

        let state_color = match artifact.status.as_ref().map(|s| s.state) {
            Some(ExpiryState::Valid) => Color::Green,
            Some(ExpiryState::ExpiringSoon) => Color::Yellow,
            Some(ExpiryState::Expired) => Color::Red,
            None => Color::DarkGrey,
        };

        let source = match artifact.confidence {
            Some(c) if needs_confirmation(config, artifact) => {
                format!("{} ({:.2}, confirm)", artifact.source, c)
            }
            Some(c) => format!("{} ({:.2})", artifact.source, c),
            None => artifact.source.to_string(),
        };

        let expires = artifact
            .expires
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "enter manually".to_string());

        let days = artifact
            .status
            .as_ref()
            .map(|s| format_days(s.days_until_expiry))
            .unwrap_or_else(|| "—".to_string());

        let countdown = artifact
            .countdown
            .as_ref()
            .and_then(|c| c.progress_percentage)
            .map(|p| countdown_bar(p, BAR_WIDTH))
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(&artifact.name),
            Cell::new(artifact.kind.to_string()),
            Cell::new(source),
            Cell::new(expires),
            Cell::new(days).set_alignment(CellAlignment::Right),
            Cell::new(artifact.state_label()).fg(state_color),
            Cell::new(countdown),
            Cell::new(verdict_str)
                .fg(verdict_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

/// Print the outcome of a single `--scan`, optionally with every candidate.
pub fn render_extraction(
    file: &Path,
    result: &ExtractionResult,
    candidates: Option<&[DateCandidate]>,
    normalizer: &DateNormalizer,
    now: DateTime<Utc>,
) {
    println!("\n {} {}\n", "Scanned:".bold(), file.display());

    match result.date {
        Some(date) => {
            println!(
                " {} Expiry date {}  (confidence {:.2})",
                "✓".green(),
                date.format("%Y-%m-%d").to_string().bold(),
                result.confidence
            );
            println!(" Confirm this date before saving it.");
        }
        None => {
            println!(" {} No expiry date found; enter it manually.", "✗".red());
        }
    }

    let Some(candidates) = candidates else {
        return;
    };

    println!();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Group").add_attribute(Attribute::Bold),
            Cell::new("Matched text").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Outcome").add_attribute(Attribute::Bold),
        ]);

    for candidate in candidates {
        let (outcome, color) = match normalizer.parse(&candidate.text) {
            None => ("invalid date", Color::Red),
            Some(date) if !is_plausible(date, now) => ("implausible", Color::Yellow),
            Some(_) => ("accepted", Color::Green),
        };
        table.add_row(vec![
            Cell::new(candidate.pattern),
            Cell::new(candidate.group.to_string()),
            Cell::new(&candidate.matched),
            Cell::new(&candidate.text),
            Cell::new(outcome).fg(color),
        ]);
    }

    println!("{}", table);
}

fn count(artifacts: &[Artifact], verdict: &PolicyVerdict) -> usize {
    artifacts.iter().filter(|a| &a.verdict == verdict).count()
}

fn format_days(days: i64) -> String {
    if days < 0 {
        format!("{} overdue", -days)
    } else {
        days.to_string()
    }
}

/// Text progress bar such as `[#########---]  75%`.
fn countdown_bar(progress: f64, width: usize) -> String {
    let filled = ((progress / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        progress
    )
}

fn summarize_states(artifacts: &[Artifact], verdict: &PolicyVerdict) -> String {
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for artifact in artifacts.iter().filter(|a| &a.verdict == verdict) {
        *counts.entry(artifact.state_label()).or_insert(0) += 1;
    }

    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(state, cnt)| format!("{} ({})", state, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArtifactKind, ExpiryStatus, SourceKind};

    fn artifact(state: Option<ExpiryState>, verdict: PolicyVerdict) -> Artifact {
        let mut a = Artifact::new("a".into(), ArtifactKind::Subscription, SourceKind::Manifest);
        a.status = state.map(|state| ExpiryStatus {
            state,
            days_until_expiry: 1,
            progress_percentage: None,
        });
        a.verdict = verdict;
        a
    }

    #[test]
    fn test_countdown_bar() {
        assert_eq!(countdown_bar(0.0, 4), "[----]   0%");
        assert_eq!(countdown_bar(50.0, 4), "[##--]  50%");
        assert_eq!(countdown_bar(100.0, 4), "[####] 100%");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(12), "12");
        assert_eq!(format_days(0), "0");
        assert_eq!(format_days(-3), "3 overdue");
    }

    #[test]
    fn test_summarize_states() {
        let artifacts = vec![
            artifact(Some(ExpiryState::ExpiringSoon), PolicyVerdict::Warn),
            artifact(None, PolicyVerdict::Warn),
            artifact(Some(ExpiryState::ExpiringSoon), PolicyVerdict::Warn),
            artifact(Some(ExpiryState::Valid), PolicyVerdict::Pass),
        ];
        assert_eq!(
            summarize_states(&artifacts, &PolicyVerdict::Warn),
            "[Expiring Soon (2), Unresolved (1)]"
        );
        assert_eq!(summarize_states(&artifacts, &PolicyVerdict::Error), "");
    }
}
