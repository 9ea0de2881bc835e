//! Common utility functions

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Date format for report rows
pub const REPORT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Format a timestamp for report rows
pub fn format_report_date(dt: &DateTime<Utc>) -> String {
    dt.format(REPORT_DATE_FORMAT).to_string()
}

/// Format a timestamp for storage (RFC 3339, millisecond precision)
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Parse a stored RFC 3339 timestamp
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Date forms written by browsers' `toLocaleDateString`, day-first tried first
const LOCALE_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%m/%d/%Y", "%Y-%m-%d", "%d.%m.%Y", "%d-%m-%Y"];

/// Parse a locale date string to midnight UTC
pub fn parse_locale_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    LOCALE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Get current UTC datetime
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Calendar years between two timestamps (`to.year - from.year`)
pub fn calendar_years_between(from: &DateTime<Utc>, to: &DateTime<Utc>) -> i32 {
    to.year() - from.year()
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Remove every occurrence of the tags, keeping the content between them
pub fn remove_tags(text: &str, start_tag: &str, end_tag: &str) -> String {
    text.replace(start_tag, "").replace(end_tag, "")
}

/// Strip markdown code fences (```json / ```) and surrounding whitespace
pub fn strip_code_fences(text: &str) -> String {
    remove_tags(text, "```json", "```").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_round_trip() {
        let dt = Utc.with_ymd_and_hms(2024, 7, 15, 8, 30, 0).unwrap();
        let s = format_timestamp(&dt);
        assert_eq!(s, "2024-07-15T08:30:00.000Z");
        assert_eq!(parse_timestamp(&s), Some(dt));
    }

    #[test]
    fn test_parse_timestamp_accepts_js_iso_strings() {
        let dt = parse_timestamp("2023-12-15T17:23:54.120Z").unwrap();
        assert_eq!(dt.year(), 2023);
        assert!(parse_timestamp("15/12/2023").is_none());
    }

    #[test]
    fn test_parse_locale_date() {
        let dt = parse_locale_date("5/12/2016").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2016, 12, 5));
        let dt = parse_locale_date("12/25/2023").unwrap();
        assert_eq!((dt.month(), dt.day()), (12, 25));
        assert!(parse_locale_date("yesterday").is_none());
    }

    #[test]
    fn test_format_report_date() {
        let dt = Utc.with_ymd_and_hms(2016, 12, 5, 17, 23, 54).unwrap();
        assert_eq!(format_report_date(&dt), "05/12/2016");
    }

    #[test]
    fn test_calendar_years_between() {
        let jan = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let dec = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        let next = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(calendar_years_between(&jan, &dec), 0);
        assert_eq!(calendar_years_between(&dec, &next), 2);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Apa itu fotosintesis pada tumbuhan?", 20), "Apa itu fotosintesis");
        assert_eq!(truncate_chars("short", 20), "short");
        // multi-byte characters are counted, not bytes
        assert_eq!(truncate_chars("ééééé", 3), "ééé");
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_remove_tags() {
        assert_eq!(remove_tags("a[x]b[/x]c", "[x]", "[/x]"), "abc");
    }
}
