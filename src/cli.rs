use std::path::PathBuf;

use clap::Parser;

use crate::models::SourceKind;

#[derive(Parser, Debug)]
#[command(
    name = "expiry-checkr",
    about = "Track expiring certificates and subscriptions",
    version
)]
pub struct Cli {
    /// Project path holding expiry.toml, artifacts.json and/or scans/
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Config file [default: ./.expiry-checkr/config.toml, fallback ~/.config/expiry-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to expiry-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "expiry-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// Exclude an inventory source (repeatable)
    #[arg(long = "exclude-source", value_name = "SOURCE")]
    pub exclude_source: Vec<SourceArg>,

    /// Evaluate as of this instant instead of the wall clock (any supported date layout)
    #[arg(long, value_name = "INSTANT")]
    pub now: Option<String>,

    /// Extract the expiry date from a single scanned text file and exit
    #[arg(long, value_name = "FILE")]
    pub scan: Option<PathBuf>,

    /// With --scan, list every candidate match in priority order
    #[arg(long, requires = "scan")]
    pub explain: bool,

    /// Show all artifacts (not just warnings/errors)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum SourceArg {
    Manifest,
    Json,
    Scan,
}

impl From<&SourceArg> for SourceKind {
    fn from(arg: &SourceArg) -> Self {
        match arg {
            SourceArg::Manifest => SourceKind::Manifest,
            SourceArg::Json => SourceKind::Json,
            SourceArg::Scan => SourceKind::Scan,
        }
    }
}
