use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[must_use]
pub fn datetime_to_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Converts epoch milliseconds back to a UTC datetime, rounding to the
/// nearest millisecond. Returns `None` for non-finite or out-of-range input.
#[must_use]
pub fn millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    let rounded = millis.round();
    if rounded > (i64::MAX as f64) || rounded < (i64::MIN as f64) {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(rounded as i64)
}

/// Parses the ISO-8601 shapes accepted for time bar and option dates.
///
/// Offset-less values are interpreted as UTC; plain dates map to midnight UTC.
#[must_use]
pub fn parse_iso_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Formats a datetime the way browsers serialize dates (`toISOString`).
#[must_use]
pub fn format_iso_datetime(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{datetime_to_millis, format_iso_datetime, millis_to_datetime, parse_iso_datetime};
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_plain_date_as_utc_midnight() {
        let parsed = parse_iso_datetime("2020-03-01").expect("plain date");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_offsets_and_naive_datetimes() {
        let with_offset = parse_iso_datetime("2020-03-01T12:00:00+02:00").expect("offset");
        assert_eq!(with_offset, Utc.with_ymd_and_hms(2020, 3, 1, 10, 0, 0).unwrap());

        let naive = parse_iso_datetime("2020-03-01T12:30:00").expect("naive");
        assert_eq!(naive, Utc.with_ymd_and_hms(2020, 3, 1, 12, 30, 0).unwrap());

        let spaced = parse_iso_datetime(" 2020-03-01 12:30 ").expect("spaced");
        assert_eq!(spaced, naive);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_iso_datetime("not a date").is_none());
        assert!(parse_iso_datetime("").is_none());
        assert!(parse_iso_datetime("2020-13-45").is_none());
    }

    #[test]
    fn millis_conversion_round_trips() {
        let time = Utc.with_ymd_and_hms(2021, 7, 4, 8, 15, 0).unwrap();
        let millis = datetime_to_millis(time);
        assert_eq!(millis_to_datetime(millis), Some(time));
        assert_eq!(millis_to_datetime(f64::NAN), None);
    }

    #[test]
    fn iso_output_matches_browser_shape() {
        let time = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_iso_datetime(time), "2020-01-01T00:00:00.000Z");
    }
}
