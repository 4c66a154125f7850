use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{AppError, Result};

// RFC 3339 requires seconds; these cover the shorter ISO-8601 forms.
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a target instant from an ISO-8601 attribute value.
///
/// Values with an offset are taken as written, date-times without one are
/// read as UTC, and a bare date means UTC midnight.
pub fn parse_target_instant(raw: &str) -> Result<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::InvalidTarget("empty value".to_string()));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    let with_offset = match value.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(&with_offset, format) {
            return Ok(instant.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(AppError::InvalidTarget(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rfc3339_with_offset() {
        let parsed = parse_target_instant("2025-06-01T14:00:00-04:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap());

        let parsed = parse_target_instant("2025-06-01T14:00:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_offset_without_seconds() {
        assert_eq!(
            parse_target_instant("2025-06-01T14:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_target_instant("2025-06-01T14:00Z").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap()
        );
        assert_eq!(
            parse_target_instant("2025-06-01T14:00-0430").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 18, 30, 0).unwrap()
        );
        assert_eq!(
            parse_target_instant("2025-06-01T14:00:15+0200").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 15).unwrap()
        );
        assert_eq!(
            parse_target_instant("2025-06-01 14:00+01:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_naive_date_time_is_utc() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 14, 30, 0).unwrap();
        assert_eq!(parse_target_instant("2025-06-01T14:30").unwrap(), expected);
        assert_eq!(parse_target_instant("2025-06-01T14:30:00").unwrap(), expected);
        assert_eq!(parse_target_instant(" 2025-06-01 14:30 ").unwrap(), expected);
    }

    #[test]
    fn test_bare_date_is_midnight() {
        assert_eq!(
            parse_target_instant("2025-06-01").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(parse_target_instant(""), Err(AppError::InvalidTarget(_))));
        assert!(matches!(parse_target_instant("   "), Err(AppError::InvalidTarget(_))));
        assert!(matches!(parse_target_instant("next tuesday"), Err(AppError::InvalidTarget(_))));
        assert!(matches!(parse_target_instant("2025-13-40"), Err(AppError::InvalidTarget(_))));
    }
}
