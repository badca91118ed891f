use anyhow::Result;
use chrono::{DateTime, Months, Utc};
use tracing::debug;

use crate::date::normalizer::DateNormalizer;
use crate::extract::patterns::{ExtractionPattern, PatternTable};
use crate::models::{DateCandidate, ExtractionResult};

/// Extracted dates further than this from `now`, either way, are discarded.
pub const PLAUSIBILITY_YEARS: u32 = 5;

/// Starting score for any accepted match.
pub const BASE_CONFIDENCE: f64 = 0.5;

/// Confidence never exceeds this, however many bonuses apply.
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Scans free text for the most likely expiry date.
pub struct ExpiryExtractor {
    patterns: PatternTable,
    normalizer: DateNormalizer,
}

impl ExpiryExtractor {
    pub fn new() -> Result<Self> {
        let patterns = PatternTable::builtin()?;
        debug!(patterns = patterns.len(), "extraction table compiled");
        Ok(ExpiryExtractor {
            patterns,
            normalizer: DateNormalizer::new()?,
        })
    }

    pub fn normalizer(&self) -> &DateNormalizer {
        &self.normalizer
    }

    /// Return the best expiry date in `raw` and how confident we are in it.
    ///
    /// Patterns are tried in table order; the first one that both matches and
    /// yields a plausible date wins, regardless of where in the text other
    /// patterns would have matched.
    pub fn extract(&self, raw: &str, now: DateTime<Utc>) -> ExtractionResult {
        let text = collapse_whitespace(raw);
        if text.is_empty() {
            return ExtractionResult::absent();
        }

        self.patterns
            .iter()
            .enumerate()
            .filter_map(|(idx, pattern)| candidate(idx, pattern, &text).map(|c| (pattern, c)))
            .find_map(|(pattern, candidate)| {
                let date = self.normalizer.parse(&candidate.text)?;
                if !is_plausible(date, now) {
                    debug!(date = %date, matched = %candidate.matched, "discarding implausible expiry date");
                    return None;
                }
                let confidence = score(pattern, &candidate.matched);
                debug!(date = %date, confidence, group = %candidate.group, "expiry date extracted");
                Some(ExtractionResult {
                    date: Some(date),
                    confidence,
                })
            })
            .unwrap_or_else(ExtractionResult::absent)
    }

    /// Every structural match in priority order, one per pattern, before
    /// normalization or plausibility checks.
    pub fn candidates(&self, raw: &str) -> Vec<DateCandidate> {
        let text = collapse_whitespace(raw);
        self.patterns
            .iter()
            .enumerate()
            .filter_map(|(idx, pattern)| candidate(idx, pattern, &text))
            .collect()
    }
}

fn candidate(idx: usize, pattern: &ExtractionPattern, text: &str) -> Option<DateCandidate> {
    let caps = pattern.regex.captures(text)?;
    Some(DateCandidate {
        text: caps.get(1)?.as_str().to_string(),
        matched: caps.get(0)?.as_str().to_string(),
        pattern: idx,
        group: pattern.group,
    })
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Within [`PLAUSIBILITY_YEARS`] of `now`, bounds inclusive.
pub fn is_plausible(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let window = Months::new(PLAUSIBILITY_YEARS * 12);
    let (Some(earliest), Some(latest)) = (
        now.checked_sub_months(window),
        now.checked_add_months(window),
    ) else {
        return false;
    };
    date >= earliest && date <= latest
}

/// Additive keyword bonuses over [`BASE_CONFIDENCE`], capped at [`MAX_CONFIDENCE`].
pub fn score(pattern: &ExtractionPattern, matched: &str) -> f64 {
    let source = pattern.source();
    let matched = matched.to_lowercase();

    let mut confidence = BASE_CONFIDENCE;
    if source.contains("expir") {
        confidence += 0.3;
    }
    if source.contains("valid") {
        confidence += 0.2;
    }
    if pattern.requires_colon {
        confidence += 0.1;
    }
    if matched.contains("expiry date") {
        confidence += 0.2;
    }
    if matched.contains("valid until") {
        confidence += 0.2;
    }
    if matched.contains("expires") {
        confidence += 0.15;
    }

    confidence.min(MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatternGroup;
    use chrono::{Datelike, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    fn extractor() -> ExpiryExtractor {
        ExpiryExtractor::new().unwrap()
    }

    fn ymd(result: &ExtractionResult) -> Option<(i32, u32, u32)> {
        result.date.map(|d| (d.year(), d.month(), d.day()))
    }

    #[test]
    fn test_labeled_expiry_date() {
        let result = extractor().extract("Expiry Date: 12/31/2026", now());
        assert_eq!(ymd(&result), Some((2026, 12, 31)));
        assert!(result.confidence >= 0.8);
        assert_eq!(result.confidence, MAX_CONFIDENCE);
    }

    #[test]
    fn test_no_relevant_content() {
        let result = extractor().extract("no relevant content here", now());
        assert_eq!(result, ExtractionResult::absent());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extractor().extract(" \n\t ", now()), ExtractionResult::absent());
    }

    #[test]
    fn test_far_future_date_is_rejected() {
        let result = extractor().extract("Expiry Date: 12/31/2036", now());
        assert_eq!(result, ExtractionResult::absent());
    }

    #[test]
    fn test_far_past_date_is_rejected() {
        let result = extractor().extract("Certificate expired on 2019-01-01", now());
        assert!(!result.is_present());
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let text = "CERTIFICATE OF COMPLETION\n\n  Valid\n   until:\t\tMarch  3,\n2027\n";
        let result = extractor().extract(text, now());
        assert_eq!(ymd(&result), Some((2027, 3, 3)));
    }

    #[test]
    fn test_pattern_order_beats_text_order() {
        // The loose match comes first in the text, the labeled one wins
        let text = "Expires 2027-01-15. Renewal notice. Valid until: 03/04/2027";
        let result = extractor().extract(text, now());
        assert_eq!(ymd(&result), Some((2027, 4, 3)));
    }

    #[test]
    fn test_failed_normalization_moves_to_next_pattern() {
        let text = "Expiry date: 31/02/2027 (typo) - card expires on 2027-05-01";
        let result = extractor().extract(text, now());
        assert_eq!(ymd(&result), Some((2027, 5, 1)));
        assert!(result.confidence <= MAX_CONFIDENCE);
    }

    #[test]
    fn test_valid_until_without_colon() {
        let result = extractor().extract("Membership valid through 2027-06-30", now());
        assert_eq!(ymd(&result), Some((2027, 6, 30)));
        // base + "valid" in pattern source
        assert!((result.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_valid_until_phrase_bonus() {
        let result = extractor().extract("Valid until June 30, 2027", now());
        assert_eq!(ymd(&result), Some((2027, 6, 30)));
        // base + "valid" source + "valid until" phrase
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_loose_pattern_scores_lower() {
        let result = extractor().extract("This plan will expire at the end of 2027-02-28 billing", now());
        assert_eq!(ymd(&result), Some((2027, 2, 28)));
        assert!((result.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_is_within_bounds() {
        let texts = [
            "Expires: Jan 5, 2027",
            "valid thru 01/02/2027",
            "expiration somewhere 2026-11-01",
            "EXPIRY DATE: 2027-01-01 expires valid until",
        ];
        let ex = extractor();
        for text in texts {
            let result = ex.extract(text, now());
            assert!(result.is_present(), "{text}");
            assert!(result.confidence >= BASE_CONFIDENCE && result.confidence <= MAX_CONFIDENCE);
        }
    }

    #[test]
    fn test_candidates_in_priority_order() {
        let text = "Expires: 2027-01-15 and valid until 2027-02-01";
        let candidates = extractor().candidates(text);
        let groups: Vec<PatternGroup> = candidates.iter().map(|c| c.group).collect();
        assert_eq!(
            groups,
            vec![PatternGroup::Labeled, PatternGroup::ValidUntil, PatternGroup::Loose]
        );
        assert_eq!(candidates[0].text, "2027-01-15");
        assert_eq!(candidates[1].text, "2027-02-01");
    }

    #[test]
    fn test_plausibility_bounds_inclusive() {
        let now = now();
        let edge = Utc.with_ymd_and_hms(2031, 10, 16, 9, 0, 0).unwrap();
        assert!(is_plausible(edge, now));
        assert!(!is_plausible(edge + chrono::Duration::seconds(1), now));
        let past_edge = Utc.with_ymd_and_hms(2021, 10, 16, 9, 0, 0).unwrap();
        assert!(is_plausible(past_edge, now));
    }

    #[test]
    fn test_date_inside_digit_run_is_ignored() {
        let result = extractor().extract("Expires after 12024-01-01 uses", now());
        assert_eq!(result, ExtractionResult::absent());

        let result = extractor().extract("Card expires 2027-02-28T23:59:59Z", now());
        assert_eq!(ymd(&result), Some((2027, 2, 28)));
    }

    fn pattern(source: &str, requires_colon: bool) -> ExtractionPattern {
        ExtractionPattern::new(source, PatternGroup::Loose, requires_colon).unwrap()
    }

    #[test]
    fn test_score_bonuses() {
        // No keyword in the source, so only the flags and phrases count
        let plain = pattern(r"(\d{4})", false);
        let colon = pattern(r"(\d{4})", true);
        let expir = pattern(r"expir[a-z]* (\d{4})", false);
        let valid = pattern(r"valid (\d{4})", false);

        let cases: [(&ExtractionPattern, &str, f64); 11] = [
            (&plain, "2027", 0.5),
            (&colon, "2027", 0.6),
            (&plain, "Expiry Date 2027", 0.7),
            (&plain, "valid until 2027", 0.7),
            (&plain, "EXPIRES 2027", 0.65),
            (&expir, "2027", 0.8),
            (&valid, "2027", 0.7),
            (&colon, "expires 2027", 0.75),
            (&plain, "expiry date, expires 2027", 0.85),
            (&plain, "valid until, expiry date 2027", 0.9),
            // Every bonus at once is capped
            (&expir, "expiry date: valid until, expires 2027", MAX_CONFIDENCE),
        ];
        for (pattern, matched, expected) in cases {
            let got = score(pattern, matched);
            assert!((got - expected).abs() < 1e-9, "{matched}: {got} != {expected}");
        }
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\t c  "), "a b c");
    }
}
