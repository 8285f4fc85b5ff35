//! Per-column date/time format detection.
//!
//! A fixed, prioritized list of prefix patterns is scored against a
//! sample of the column's textual values; the first pattern reaching the
//! match threshold wins. Greedy and order-sensitive by design: ties go to
//! declaration order, not best match count.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Number of non-missing values sampled per column.
pub const DETECT_SAMPLE: usize = 50;

/// Minimum number of sample values a pattern must match.
pub const DETECT_THRESHOLD: usize = 5;

/// One candidate date/time shape.
#[derive(Debug)]
pub struct DateFormat {
    pattern: Regex,
    /// chrono format string used for reparsing.
    pub format: &'static str,
    /// Whether the format carries a time-of-day component.
    pub with_time: bool,
}

impl DateFormat {
    fn new(pattern: &str, format: &'static str, with_time: bool) -> Self {
        Self {
            // The patterns are fixed literals; construction cannot fail.
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid date pattern: {e}")),
            format,
            with_time,
        }
    }

    /// Parse one value with this format. Failures yield `None`; the
    /// caller coerces them to missing.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        if self.with_time {
            NaiveDateTime::parse_from_str(value, self.format).ok()
        } else {
            NaiveDate::parse_from_str(value, self.format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        }
    }
}

static DATE_FORMATS: LazyLock<Vec<DateFormat>> = LazyLock::new(|| {
    vec![
        DateFormat::new(r"^\d{4}-\d{2}-\d{2}", "%Y-%m-%d", false),
        DateFormat::new(r"^\d{2}/\d{2}/\d{4}", "%d/%m/%Y", false),
        DateFormat::new(r"^\d{2}-\d{2}-\d{4}", "%d-%m-%Y", false),
        DateFormat::new(r"^\d{4}/\d{2}/\d{2}", "%Y/%m/%d", false),
        // SAS-style datetime, e.g. 07FEB2024:13:45:00.
        DateFormat::new(
            r"^\d{2}[A-Z]{3}\d{4}:\d{2}:\d{2}:\d{2}",
            "%d%b%Y:%H:%M:%S",
            true,
        ),
    ]
});

/// Detect a parse format from a column's textual sample values.
///
/// Takes the first [`DETECT_SAMPLE`] values offered; the first pattern
/// (in priority order) matching at least [`DETECT_THRESHOLD`] of them
/// wins. Returns `None` when no pattern reaches the threshold, leaving
/// the column textual.
pub fn detect_format<'a, I>(samples: I) -> Option<&'static DateFormat>
where
    I: IntoIterator<Item = &'a str>,
{
    let sample: Vec<&str> = samples.into_iter().take(DETECT_SAMPLE).collect();
    DATE_FORMATS.iter().find(|candidate| {
        sample
            .iter()
            .filter(|value| candidate.pattern.is_match(value))
            .count()
            >= DETECT_THRESHOLD
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dates_reach_threshold() {
        let samples: Vec<String> = (1..=5).map(|d| format!("2024-01-{d:02}")).collect();
        let format = detect_format(samples.iter().map(String::as_str)).unwrap();
        assert_eq!(format.format, "%Y-%m-%d");
    }

    #[test]
    fn under_threshold_returns_none() {
        let samples = ["2024-01-01", "2024-01-02", "abc", "def", "ghi"];
        assert!(detect_format(samples).is_none());
    }

    #[test]
    fn priority_order_breaks_ties() {
        // Matches both D/M/Y and nothing earlier; declaration order wins.
        let samples: Vec<String> = (1..=6).map(|d| format!("{d:02}/03/2024")).collect();
        let format = detect_format(samples.iter().map(String::as_str)).unwrap();
        assert_eq!(format.format, "%d/%m/%Y");
    }

    #[test]
    fn sas_datetime_parses_with_time() {
        let samples: Vec<String> = (1..=5).map(|d| format!("{d:02}FEB2024:13:45:00")).collect();
        let format = detect_format(samples.iter().map(String::as_str)).unwrap();
        assert!(format.with_time);
        let parsed = format.parse("07FEB2024:13:45:00").unwrap();
        assert_eq!(parsed.format("%Y-%m-%dT%H:%M:%S").to_string(), "2024-02-07T13:45:00");
    }

    #[test]
    fn parse_failure_on_matching_prefix_returns_none() {
        let samples: Vec<String> = (1..=5).map(|d| format!("2024-01-{d:02}")).collect();
        let format = detect_format(samples.iter().map(String::as_str)).unwrap();
        // Prefix matches the pattern but the full value is not the format.
        assert!(format.parse("2024-01-02 10:00").is_none());
        assert!(format.parse("2024-13-40").is_none());
    }

    #[test]
    fn only_first_sample_window_is_considered() {
        // 60 values, the ISO ones all fall outside the 50-value window.
        let mut samples: Vec<String> = (0..50).map(|i| format!("v{i}")).collect();
        samples.extend((1..=10).map(|d| format!("2024-01-{d:02}")));
        assert!(detect_format(samples.iter().map(String::as_str)).is_none());
    }
}
