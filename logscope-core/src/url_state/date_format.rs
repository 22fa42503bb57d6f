use super::UrlParamError;
use chrono::{DateTime, Utc};

/// `01-May-2024_12-30+0000`. Minute resolution; always written in UTC.
pub const URL_DATE_FORMAT: &str = "%d-%b-%Y_%H-%M%z";

pub fn format_url_date(instant: DateTime<Utc>) -> String {
    instant.format(URL_DATE_FORMAT).to_string()
}

/// Parses a date written by [`format_url_date`], or by another client in any
/// UTC offset.
///
/// A `+` that arrived unescaped in a query string decodes to a space, so a
/// space before the offset is read as `+`.
pub fn parse_url_date(value: &str) -> Result<DateTime<Utc>, UrlParamError> {
    let normalized = value.trim().replace(' ', "+");
    DateTime::parse_from_str(&normalized, URL_DATE_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| UrlParamError::BadDate {
            value: value.to_string(),
        })
}
