use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

// ── Calendar month helpers ────────────────────────────────────────────────────

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month, so `with_day(1)` cannot fail.
    date.with_day(1).unwrap_or(date)
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
///
/// `2024-01-31 → 2024-02-01` is one month; negative when `to` precedes
/// `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

/// Current UTC time without an offset, comparable with dataset timestamps.
pub fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}

// ── Parsing ───────────────────────────────────────────────────────────────────

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` and any timestamp accepted by
/// [`parse_timestamp`] (the time part is dropped). Returns `None` for empty
/// or unrecognised input.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    parse_timestamp_quiet(s).map(|ts| ts.date())
}

/// Parse an event timestamp into a naive datetime.
///
/// Offset-carrying RFC 3339 strings (including the `Z` suffix) are converted
/// to UTC first. A bare date is read as midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let parsed = parse_timestamp_quiet(s.trim()).or_else(|| {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s.trim(), fmt).ok())
            .map(start_of_day)
    });
    if parsed.is_none() && !s.trim().is_empty() {
        warn!("could not parse timestamp \"{}\"", s);
    }
    parsed
}

fn parse_timestamp_quiet(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // ── month_start / month_end ──────────────────────────────────────────────

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date("2024-01-15")), date("2024-01-01"));
        assert_eq!(month_start(date("2024-01-01")), date("2024-01-01"));
    }

    #[test]
    fn test_month_end_regular_and_leap() {
        assert_eq!(month_end(date("2024-01-15")), date("2024-01-31"));
        assert_eq!(month_end(date("2024-02-01")), date("2024-02-29"));
        assert_eq!(month_end(date("2023-02-10")), date("2023-02-28"));
        assert_eq!(month_end(date("2023-12-31")), date("2023-12-31"));
    }

    // ── months_between ───────────────────────────────────────────────────────

    #[test]
    fn test_months_between_uses_calendar_months() {
        assert_eq!(months_between(date("2024-01-31"), date("2024-02-01")), 1);
        assert_eq!(months_between(date("2024-01-01"), date("2024-01-31")), 0);
        assert_eq!(months_between(date("2023-11-15"), date("2024-03-01")), 4);
    }

    #[test]
    fn test_months_between_negative() {
        assert_eq!(months_between(date("2024-03-01"), date("2024-01-20")), -2);
    }

    // ── parse_date ───────────────────────────────────────────────────────────

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-01-15"), Some(date("2024-01-15")));
        assert_eq!(parse_date("2024/01/15"), Some(date("2024-01-15")));
        assert_eq!(parse_date(" 2024-01-15 "), Some(date("2024-01-15")));
        assert_eq!(parse_date("2024-01-15 08:30:00"), Some(date("2024-01-15")));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    // ── parse_timestamp ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_timestamp_naive_forms() {
        let expected = date("2024-01-20").and_hms_opt(14, 5, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-20T14:05:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-20 14:05:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-20 14:05"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_rfc3339_converted_to_utc() {
        let expected = date("2024-01-20").and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-20T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-20T14:00:00+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_bare_date_is_midnight() {
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(start_of_day(date("2024-03-01")))
        );
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let ts = parse_timestamp("2024-01-20T14:05:00.250").unwrap();
        assert_eq!(ts.date(), date("2024-01-20"));
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not-a-timestamp"), None);
    }
}
