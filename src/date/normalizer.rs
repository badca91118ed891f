use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use regex::{Captures, Regex, RegexBuilder};
use tracing::trace;

/// Layouts recognised by [`DateNormalizer`], in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `DD/MM/YYYY` or `DD-MM-YYYY`.
    DayMonthYear,
    /// `YYYY-M-D` or `YYYY/M/D`.
    YearMonthDay,
    /// `YYYY-MM-DD` followed by an ISO-8601 time and optional offset.
    IsoDateTime,
    /// `YYYY-MM-DD HH:MM:SS`.
    SpacedDateTime,
    /// `Month Day, Year` or `Month Day Year`.
    NamedMonth,
}

struct LayoutRule {
    layout: Layout,
    regex: Regex,
}

/// chrono format strings tried, in order, when no structured layout matches.
const GENERIC_FORMATS: &[&str] = &["%d %B %Y", "%d %b %Y", "%d-%b-%Y", "%d.%m.%Y", "%Y.%m.%d", "%Y%m%d"];

/// Parses date strings in several real-world layouts into a UTC instant.
///
/// The first layout whose regex matches decides the outcome: if it yields an
/// impossible calendar date the result is `None`, later layouts are not tried.
/// Only when no layout matches does the generic fallback run.
pub struct DateNormalizer {
    rules: Vec<LayoutRule>,
}

impl DateNormalizer {
    pub fn new() -> Result<Self> {
        let rule = |layout: Layout, pattern: &str| -> Result<LayoutRule> {
            let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            Ok(LayoutRule { layout, regex })
        };

        let rules = vec![
            rule(Layout::DayMonthYear, r"^(\d{2})[/-](\d{2})[/-](\d{4})$")?,
            rule(Layout::YearMonthDay, r"^(\d{4})[/-](\d{1,2})[/-](\d{1,2})$")?,
            rule(
                Layout::IsoDateTime,
                r"^(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2})(?::(\d{2})(?:\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$",
            )?,
            rule(
                Layout::SpacedDateTime,
                r"^(\d{4})-(\d{2})-(\d{2}) (\d{2}):(\d{2}):(\d{2})$",
            )?,
            rule(Layout::NamedMonth, r"^([a-z]+)\.?\s+(\d{1,2}),?\s+(\d{4})$")?,
        ];

        Ok(DateNormalizer { rules })
    }

    /// Parse `input` into an instant. Returns `None` for anything unparseable.
    pub fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        for rule in &self.rules {
            if let Some(caps) = rule.regex.captures(trimmed) {
                let parsed = build(rule.layout, &caps);
                trace!(layout = ?rule.layout, input = trimmed, valid = parsed.is_some(), "date layout matched");
                return parsed;
            }
        }

        let parsed = parse_generic(trimmed);
        trace!(input = trimmed, valid = parsed.is_some(), "generic date fallback");
        parsed
    }
}

fn build(layout: Layout, caps: &Captures<'_>) -> Option<DateTime<Utc>> {
    match layout {
        Layout::DayMonthYear => {
            let (mut day, mut month) = (number(caps, 1)?, number(caps, 2)?);
            // A month field above 12 with a plausible month in front is US order
            if month > 12 && day <= 12 {
                std::mem::swap(&mut day, &mut month);
            }
            midnight(year(caps, 3)?, month, day)
        }
        Layout::YearMonthDay => midnight(year(caps, 1)?, number(caps, 2)?, number(caps, 3)?),
        Layout::IsoDateTime => {
            let date = NaiveDate::from_ymd_opt(year(caps, 1)?, number(caps, 2)?, number(caps, 3)?)?;
            let second = match caps.get(6) {
                Some(_) => number(caps, 6)?,
                None => 0,
            };
            let naive = date.and_hms_opt(number(caps, 4)?, number(caps, 5)?, second)?;
            let offset = match caps.get(7) {
                Some(m) => parse_offset(m.as_str())?,
                None => FixedOffset::east_opt(0)?,
            };
            offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
        }
        Layout::SpacedDateTime => {
            let naive = NaiveDate::from_ymd_opt(year(caps, 1)?, number(caps, 2)?, number(caps, 3)?)?
                .and_hms_opt(number(caps, 4)?, number(caps, 5)?, number(caps, 6)?)?;
            Some(Utc.from_utc_datetime(&naive))
        }
        Layout::NamedMonth => {
            let month = month_from_name(caps.get(1)?.as_str())?;
            midnight(year(caps, 3)?, month, number(caps, 2)?)
        }
    }
}

fn number(caps: &Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx)?.as_str().parse().ok()
}

fn year(caps: &Captures<'_>, idx: usize) -> Option<i32> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Midnight UTC on the given day. `None` for dates that do not exist.
fn midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Parse `Z`, `+HH:MM` or `+HHMM`.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }
    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Map an English month name or abbreviation to its 1-based number.
pub fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn parse_generic(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    GENERIC_FORMATS.iter().find_map(|fmt| {
        let date = NaiveDate::parse_from_str(input, fmt).ok()?;
        Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
    })
}
