//! Leading-timestamp extraction for syslog lines.
//!
//! The first whitespace-delimited token of a line is parsed as an ISO-8601
//! date-time, extended (`2024-01-01T10:00:00`) or basic (`20240101T100000`),
//! with or without offset, down to hour precision or date-only. Offsets are
//! discarded, not converted: `2024-01-01T10:00:00+02:00` compares as
//! `2024-01-01T10:00:00`. Anything else maps to [`SENTINEL`], which sorts
//! before every real timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Earliest representable instant, assigned to lines without a parseable timestamp.
pub const SENTINEL: NaiveDateTime = NaiveDateTime::MIN;

/// Offset-free layouts tried after RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Layouts with a numeric offset lacking the colon (`+0200`), which RFC 3339 rejects.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Parse the leading timestamp of `line`, or return [`SENTINEL`].
pub fn parse(line: &str) -> NaiveDateTime {
    line.split_whitespace()
        .next()
        .and_then(parse_token)
        .unwrap_or(SENTINEL)
}

/// Whether `ts` is the placeholder for an unparseable line.
pub fn is_sentinel(ts: &NaiveDateTime) -> bool {
    *ts == SENTINEL
}

fn parse_token(token: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(token, format) {
            return Some(dt.naive_local());
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(token, format) {
            return Some(dt);
        }
    }

    if let Some(dt) = parse_hour_only(token) {
        return Some(dt);
    }

    parse_date(token).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_date(token: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
}

/// `2024-01-01T10` or `20240101T10`. chrono will not build a time without
/// minutes, so the hour is read by hand.
fn parse_hour_only(token: &str) -> Option<NaiveDateTime> {
    let (date, hour) = token.split_once('T')?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    parse_date(date)?.and_hms_opt(hour.parse().ok()?, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    mod accepted_formats {
        use super::*;

        #[test]
        fn test_naive_datetime() {
            assert_eq!(
                parse("2024-01-01T10:00:00 boot"),
                at(2024, 1, 1, 10, 0, 0)
            );
        }

        #[test]
        fn test_rsyslog_high_precision_keeps_wall_clock() {
            let ts = parse("2024-03-05T14:22:01.123456+02:00 web-1 CRON[42]: session opened");
            assert_eq!(
                ts,
                NaiveDate::from_ymd_opt(2024, 3, 5)
                    .unwrap()
                    .and_hms_micro_opt(14, 22, 1, 123456)
                    .unwrap()
            );
        }

        #[test]
        fn test_utc_designator() {
            assert_eq!(parse("2024-01-01T10:00:00Z x"), at(2024, 1, 1, 10, 0, 0));
        }

        #[test]
        fn test_offset_is_discarded_not_converted() {
            assert_eq!(
                parse("2024-01-01T10:00:00-05:00 x"),
                parse("2024-01-01T10:00:00+09:00 y")
            );
        }

        #[test]
        fn test_offset_without_colon() {
            assert_eq!(
                parse("2024-01-01T10:00:00+0100 x"),
                at(2024, 1, 1, 10, 0, 0)
            );
        }

        #[test]
        fn test_minute_precision() {
            assert_eq!(parse("2024-01-01T10:07 x"), at(2024, 1, 1, 10, 7, 0));
        }

        #[test]
        fn test_date_only_is_midnight() {
            assert_eq!(parse("2024-01-01 something"), at(2024, 1, 1, 0, 0, 0));
        }

        #[test]
        fn test_hour_precision() {
            assert_eq!(parse("2024-01-01T10 x"), at(2024, 1, 1, 10, 0, 0));
            assert_eq!(parse("20240101T10 x"), at(2024, 1, 1, 10, 0, 0));
        }

        #[test]
        fn test_basic_format() {
            assert_eq!(parse("20240101T100000 x"), at(2024, 1, 1, 10, 0, 0));
            assert_eq!(parse("20240101T1007 x"), at(2024, 1, 1, 10, 7, 0));
            assert_eq!(parse("20240101 x"), at(2024, 1, 1, 0, 0, 0));
        }

        #[test]
        fn test_basic_and_extended_forms_agree() {
            assert_eq!(
                parse("20240305T142201.5 a"),
                parse("2024-03-05T14:22:01.5 b")
            );
        }

        #[test]
        fn test_leading_whitespace_is_skipped() {
            assert_eq!(parse("   2024-01-01T10:00:00 x"), at(2024, 1, 1, 10, 0, 0));
        }
    }

    mod fallback {
        use super::*;

        #[test]
        fn test_garbled_line() {
            assert!(is_sentinel(&parse("garbled line no date")));
        }

        #[test]
        fn test_empty_line() {
            assert!(is_sentinel(&parse("")));
            assert!(is_sentinel(&parse("   ")));
        }

        #[test]
        fn test_traditional_bsd_syslog_header() {
            assert!(is_sentinel(&parse("Jan  1 10:00:00 host sshd[1]: hello")));
        }

        #[test]
        fn test_invalid_calendar_date() {
            assert!(is_sentinel(&parse("2024-13-45T10:00:00 x")));
        }

        #[test]
        fn test_out_of_range_hour() {
            assert!(is_sentinel(&parse("2024-01-01T24 x")));
            assert!(is_sentinel(&parse("2024-01-01T1 x")));
        }

        #[test]
        fn test_sentinel_sorts_before_real_timestamps() {
            assert!(parse("no date") < parse("1970-01-01T00:00:00 epoch"));
        }
    }
}
