use anyhow::Result;
use regex::{Regex, RegexBuilder};

use crate::models::PatternGroup;

/// English month names and abbreviations, as a regex alternation.
const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// Label that opens a [`PatternGroup::Labeled`] pattern, colon included.
const LABEL: &str = r"\b(?:expiry|expiration|expires|expire|valid)(?:\s+(?:date|on|until|through|thru))?\s*:\s*";

/// Label that opens a [`PatternGroup::ValidUntil`] pattern; the colon is optional.
const VALID_UNTIL: &str = r"\bvalid\s+(?:until|through|thru)\s*:?\s*";

/// Any `expir*` word followed, eventually, by a date.
const LOOSE: &str = r"\bexpir[a-z]*\b.*?";

/// Dates stand alone, not carved out of a longer digit run.
const SLASHED: &str = r"\b(\d{2}[/-]\d{2}[/-]\d{4})\b";
/// An ISO date may run straight into a `T` time tail.
const DASHED_ISO: &str = r"\b(\d{4}-\d{2}-\d{2})(?:\b|T)";

/// One entry of the extraction table.
#[derive(Debug)]
pub struct ExtractionPattern {
    pub regex: Regex,
    pub group: PatternGroup,
    /// The label must be followed by a colon for this pattern to match.
    pub requires_colon: bool,
}

impl ExtractionPattern {
    pub fn new(source: &str, group: PatternGroup, requires_colon: bool) -> Result<Self> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(ExtractionPattern {
            regex,
            group,
            requires_colon,
        })
    }

    /// The pattern's regex source, lowercased for keyword scoring.
    pub fn source(&self) -> String {
        self.regex.as_str().to_lowercase()
    }
}

/// Ordered extraction patterns, most specific first. Built once and shared by reference.
#[derive(Debug)]
pub struct PatternTable {
    patterns: Vec<ExtractionPattern>,
}

impl PatternTable {
    /// The built-in table: labeled, then `valid until`, then loose `expir*` patterns,
    /// each in named-month, slashed and dashed-ISO flavours.
    pub fn builtin() -> Result<Self> {
        let named = format!(r"(\b(?:{MONTHS})\.?\s+\d{{1,2}},?\s+\d{{4}})");

        let groups = [
            (LABEL, PatternGroup::Labeled, true),
            (VALID_UNTIL, PatternGroup::ValidUntil, false),
            (LOOSE, PatternGroup::Loose, false),
        ];

        let mut patterns = Vec::with_capacity(groups.len() * 3);
        for (prefix, group, requires_colon) in groups {
            for date in [named.as_str(), SLASHED, DASHED_ISO] {
                patterns.push(ExtractionPattern::new(
                    &format!("{prefix}{date}"),
                    group,
                    requires_colon,
                )?);
            }
        }

        Ok(PatternTable { patterns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractionPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let table = PatternTable::builtin().unwrap();
        let groups: Vec<PatternGroup> = table.iter().map(|p| p.group).collect();
        assert_eq!(table.len(), 9);
        assert!(groups[..3].iter().all(|g| *g == PatternGroup::Labeled));
        assert!(groups[3..6].iter().all(|g| *g == PatternGroup::ValidUntil));
        assert!(groups[6..].iter().all(|g| *g == PatternGroup::Loose));
    }

    #[test]
    fn test_only_labeled_patterns_require_colon() {
        let table = PatternTable::builtin().unwrap();
        for p in table.iter() {
            assert_eq!(p.requires_colon, p.group == PatternGroup::Labeled);
        }
    }

    #[test]
    fn test_labeled_needs_colon() {
        let table = PatternTable::builtin().unwrap();
        let slashed = table.iter().nth(1).unwrap();
        assert!(slashed.regex.is_match("Expiry Date: 12/31/2026"));
        assert!(slashed.regex.is_match("VALID THRU: 01/02/2027"));
        assert!(!slashed.regex.is_match("Expiry Date 12/31/2026"));
    }

    #[test]
    fn test_named_month_requires_real_month() {
        let table = PatternTable::builtin().unwrap();
        let named = table.iter().next().unwrap();
        let caps = named.regex.captures("Expires on: March 3, 2027").unwrap();
        assert_eq!(&caps[1], "March 3, 2027");
        assert!(!named.regex.is_match("Expires on: Order 3, 2027"));
    }

    #[test]
    fn test_numeric_dates_need_word_boundaries() {
        let table = PatternTable::builtin().unwrap();
        let loose: Vec<&ExtractionPattern> =
            table.iter().filter(|p| p.group == PatternGroup::Loose).collect();
        let (slashed, iso) = (loose[1], loose[2]);

        assert!(!iso.regex.is_match("expires in 12024-01-01 cycles"));
        assert!(!iso.regex.is_match("expires 2024-01-015"));
        assert!(!slashed.regex.is_match("expires 112/31/2026"));
        assert!(!slashed.regex.is_match("expires 12/31/20261"));

        let caps = iso.regex.captures("expires 2027-02-28T00:00:00Z").unwrap();
        assert_eq!(&caps[1], "2027-02-28");
        let caps = slashed.regex.captures("expires (12/31/2026)").unwrap();
        assert_eq!(&caps[1], "12/31/2026");
    }
}
