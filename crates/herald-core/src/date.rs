//! Publication date parsing
//!
//! Draft authors write dates by hand, so the parser accepts the formats
//! people actually type: ISO timestamps with or without an offset, bare
//! dates, month names and a handful of relative expressions. Inputs without
//! an offset are read as UTC.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;

/// Turns a free-form date string into an instant
pub trait DateParser: Send + Sync {
    /// Parse `input`, returning `None` when it is not recognized
    fn parse(&self, input: &str) -> Option<DateTime<Utc>>;
}

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M %z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%B %d %Y %H:%M",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%d %B, %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

fn relative_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:in\s+(?P<ahead>\d+|an?)\s+(?P<ahead_unit>minute|hour|day|week)s?|(?P<ago>\d+|an?)\s+(?P<ago_unit>minute|hour|day|week)s?\s+ago)$",
        )
        .expect("relative date pattern is valid")
    })
}

/// chrono-backed parser for the common formats
///
/// Relative expressions (`now`, `tomorrow`, `in 3 days`, `2 hours ago`) are
/// resolved against the reference instant, which defaults to the current
/// time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalDateParser {
    reference: Option<DateTime<Utc>>,
}

impl NaturalDateParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative expressions against `reference` instead of now
    pub fn with_reference(reference: DateTime<Utc>) -> Self {
        Self {
            reference: Some(reference),
        }
    }

    fn reference(&self) -> DateTime<Utc> {
        self.reference.unwrap_or_else(Utc::now)
    }

    fn parse_absolute(input: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(input, format) {
                return Some(dt.with_timezone(&Utc));
            }
        }

        // A trailing `Z` marks UTC on otherwise naive timestamps
        let naive_input = input.strip_suffix(['Z', 'z']).unwrap_or(input);
        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(naive_input, format) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(input, format) {
                return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
            }
        }

        None
    }

    fn parse_relative(&self, input: &str) -> Option<DateTime<Utc>> {
        let input = input.to_lowercase();
        match input.as_str() {
            "now" | "today" => return Some(self.reference()),
            "tomorrow" => return Some(self.reference() + Duration::days(1)),
            "yesterday" => return Some(self.reference() - Duration::days(1)),
            _ => {}
        }

        let captures = relative_pattern().captures(&input)?;
        let (count, unit, sign) = match (captures.name("ahead"), captures.name("ago")) {
            (Some(count), _) => (count.as_str(), captures.name("ahead_unit")?.as_str(), 1),
            (None, Some(count)) => (count.as_str(), captures.name("ago_unit")?.as_str(), -1),
            (None, None) => return None,
        };

        let count: i64 = match count {
            "a" | "an" => 1,
            n => n.parse().ok()?,
        };
        let amount = match unit {
            "minute" => Duration::try_minutes(count * sign)?,
            "hour" => Duration::try_hours(count * sign)?,
            "day" => Duration::try_days(count * sign)?,
            "week" => Duration::try_weeks(count * sign)?,
            _ => return None,
        };

        self.reference().checked_add_signed(amount)
    }
}

impl DateParser for NaturalDateParser {
    fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        Self::parse_absolute(input).or_else(|| self.parse_relative(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn parser() -> NaturalDateParser {
        NaturalDateParser::with_reference(utc(2024, 6, 15, 12, 0))
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        assert_eq!(parser().parse("2024-01-01T19:00"), Some(utc(2024, 1, 1, 19, 0)));
        assert_eq!(parser().parse("2024-01-01 19:00:00"), Some(utc(2024, 1, 1, 19, 0)));
    }

    #[test]
    fn test_offset_is_respected() {
        assert_eq!(
            parser().parse("2024-01-01T19:00:00+02:00"),
            Some(utc(2024, 1, 1, 17, 0))
        );
        assert_eq!(parser().parse("2024-01-01T19:00Z"), Some(utc(2024, 1, 1, 19, 0)));
        assert_eq!(
            parser().parse("2024-01-01 19:00 -0500"),
            Some(utc(2024, 1, 2, 0, 0))
        );
    }

    #[test]
    fn test_bare_date_is_midnight() {
        assert_eq!(parser().parse("2024-03-05"), Some(utc(2024, 3, 5, 0, 0)));
        assert_eq!(parser().parse("2024/03/05"), Some(utc(2024, 3, 5, 0, 0)));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parser().parse("January 2, 2024"), Some(utc(2024, 1, 2, 0, 0)));
        assert_eq!(parser().parse("Jan 2, 2024"), Some(utc(2024, 1, 2, 0, 0)));
        assert_eq!(parser().parse("2 Jan 2024 10:00"), Some(utc(2024, 1, 2, 10, 0)));
        assert_eq!(parser().parse("March 4, 2024 3:30 PM"), Some(utc(2024, 3, 4, 15, 30)));
    }

    #[test]
    fn test_relative_expressions() {
        let p = parser();
        assert_eq!(p.parse("now"), Some(utc(2024, 6, 15, 12, 0)));
        assert_eq!(p.parse("Tomorrow"), Some(utc(2024, 6, 16, 12, 0)));
        assert_eq!(p.parse("yesterday"), Some(utc(2024, 6, 14, 12, 0)));
        assert_eq!(p.parse("in 3 days"), Some(utc(2024, 6, 18, 12, 0)));
        assert_eq!(p.parse("in an hour"), Some(utc(2024, 6, 15, 13, 0)));
        assert_eq!(p.parse("2 weeks ago"), Some(utc(2024, 6, 1, 12, 0)));
        assert_eq!(p.parse("30 minutes ago"), Some(utc(2024, 6, 15, 11, 30)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parser().parse(""), None);
        assert_eq!(parser().parse("   "), None);
        assert_eq!(parser().parse("not a date"), None);
        assert_eq!(parser().parse("2024-13-45"), None);
        assert_eq!(parser().parse("in many days"), None);
    }
}
