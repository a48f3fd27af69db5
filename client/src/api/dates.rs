//! Normalization of meeting filter dates to the `YYYY-MM-DD` wire format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use super::client::ApiError;

/// Wire format for the `date` query parameter.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Render a calendar date the way the meetings endpoint expects it.
#[must_use]
pub fn format_query_date(date: NaiveDate) -> String {
    date.format(QUERY_DATE_FORMAT).to_string()
}

/// Anything that names a calendar day.
///
/// Timestamps keep the calendar day of their own offset, so
/// `2025-07-22T23:30:00-05:00` is the 22nd, not the 23rd.
pub trait IntoMeetingDate {
    /// # Errors
    /// Returns [`ApiError::InvalidInput`] when the value cannot be read as a date.
    fn into_meeting_date(self) -> Result<NaiveDate, ApiError>;
}

impl IntoMeetingDate for NaiveDate {
    fn into_meeting_date(self) -> Result<NaiveDate, ApiError> {
        Ok(self)
    }
}

impl IntoMeetingDate for NaiveDateTime {
    fn into_meeting_date(self) -> Result<NaiveDate, ApiError> {
        Ok(self.date())
    }
}

impl<Tz: TimeZone> IntoMeetingDate for DateTime<Tz> {
    fn into_meeting_date(self) -> Result<NaiveDate, ApiError> {
        Ok(self.date_naive())
    }
}

impl IntoMeetingDate for &str {
    fn into_meeting_date(self) -> Result<NaiveDate, ApiError> {
        parse_date(self)
    }
}

impl IntoMeetingDate for String {
    fn into_meeting_date(self) -> Result<NaiveDate, ApiError> {
        parse_date(&self)
    }
}

/// Parse the date formats callers commonly hold: ISO dates, RFC 3339
/// timestamps, naive timestamps, and slash-separated dates.
///
/// # Errors
/// Returns [`ApiError::InvalidInput`] when no known format matches.
pub fn parse_date(input: &str) -> Result<NaiveDate, ApiError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
    }

    Err(ApiError::InvalidInput(format!(
        "unrecognized date '{input}', expected YYYY-MM-DD or an RFC 3339 timestamp"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use proptest::prelude::*;

    fn july_22() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 22).unwrap()
    }

    #[test]
    fn string_inputs_normalize_to_iso_date() {
        let cases = [
            ("2025-07-22", "plain ISO date"),
            ("  2025-07-22 ", "surrounding whitespace"),
            ("2025-07-22T09:30:00Z", "RFC 3339 UTC"),
            ("2025-07-22T23:30:00-05:00", "RFC 3339 with offset keeps local day"),
            ("2025-07-22T09:30:00.123+07:00", "fractional seconds"),
            ("2025-07-22T09:30:00", "naive timestamp"),
            ("2025-07-22T09:30", "naive timestamp without seconds"),
            ("2025-07-22 09:30:00", "space separated timestamp"),
            ("2025/07/22", "slash separated"),
            ("07/22/2025", "US month/day/year"),
        ];

        for (input, desc) in cases {
            let date = input.into_meeting_date();
            assert_eq!(date.ok(), Some(july_22()), "case '{desc}'");
        }
    }

    #[test]
    fn rejects_garbage() {
        let cases = ["", "yesterday", "2025-13-01", "22-07"];
        for input in cases {
            assert!(
                matches!(parse_date(input), Err(ApiError::InvalidInput(_))),
                "case '{input}'"
            );
        }
    }

    #[test]
    fn timestamps_use_their_own_calendar_day() {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2025, 7, 22, 1, 0, 0).unwrap();
        assert_eq!(local.into_meeting_date().unwrap(), july_22());

        let utc = Utc.with_ymd_and_hms(2025, 7, 22, 23, 59, 59).unwrap();
        assert_eq!(utc.into_meeting_date().unwrap(), july_22());
    }

    #[test]
    fn format_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_query_date(date), "2025-01-05");
        assert_eq!(format_query_date(july_22()), "2025-07-22");
    }

    proptest! {
        #[test]
        fn formatted_dates_parse_back(days in 0i64..200_000) {
            let date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + chrono::Duration::days(days);
            let formatted = format_query_date(date);
            prop_assert_eq!(formatted.len(), 10);
            prop_assert_eq!(parse_date(&formatted).unwrap(), date);
        }
    }
}
