//! Report renderers for expiry results.
//!
//! - [`terminal`]: colored tables grouped by verdict with a summary box; respects
//!   `--verbose` / `--quiet`. Also renders single `--scan` extractions.
//! - [`pdf`]: multi-page PDF with a cover, a status summary and a full artifact table.

pub mod pdf;
pub mod terminal;
