// Utility functions
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Converts unix seconds into `DateTime<Utc>`.
pub fn from_unix_secs(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Parses a timestamp as unix seconds, RFC3339, `%Y-%m-%d %H:%M:%S` or `%Y-%m-%d`.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    let s = date_str.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return from_unix_secs(secs);
    }
    // pandas writes fractional epoch seconds
    if let Ok(secs) = s.parse::<f64>() {
        if secs.is_finite() && secs.fract() == 0.0 {
            return from_unix_secs(secs as i64);
        }
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("1709251200"), Some(expected));
        assert_eq!(parse_datetime("1709251200.0"), Some(expected));
        assert_eq!(parse_datetime("2024-03-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("2024-03-01 00:00:00"), Some(expected));
        assert_eq!(parse_datetime(" 2024-03-01 "), Some(expected));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime("1709251200.5"), None);
    }
}
