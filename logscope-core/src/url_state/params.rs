use super::{MAX_PAGE, UrlParamError, format_url_date, parse_url_date};
use crate::explorer::{FilterMode, RowRange, ViewMode};
use crate::time::Preset;
use crate::window::PerPage;
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::collections::BTreeMap;
use tracing::debug;

/// Every key the synchronizer reads or writes.
pub const KEYS: [&str; 10] = [
    "view",
    "rows",
    "page",
    "interval",
    "from",
    "to",
    "query",
    "filterType",
    "fields",
    "rowNumber",
];

/// Field names keep letters, digits, `_`, `-` and `.`; everything else,
/// including any delimiter, is percent-encoded.
const FIELD_ENCODE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-').remove(b'.');

/// Typed view of the whitelisted URL parameters. `None` means the key is
/// absent (or was dropped while parsing).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pub view: Option<ViewMode>,
    pub rows: Option<PerPage>,
    /// Absolute, 1-based.
    pub page: Option<usize>,
    pub interval: Option<Preset>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub query: Option<String>,
    pub filter_type: Option<FilterMode>,
    pub fields: Option<Vec<String>>,
    pub row_number: Option<RowRange>,
}

impl UrlParams {
    pub fn to_map(&self, delimiter: char) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            map.insert(key.to_string(), value);
        };

        if let Some(view) = self.view {
            put("view", view.as_str().to_string());
        }
        if let Some(rows) = self.rows {
            put("rows", rows.to_string());
        }
        if let Some(page) = self.page {
            put("page", page.to_string());
        }
        if let Some(interval) = self.interval {
            put("interval", interval.token.to_string());
        }
        if let Some(from) = self.from {
            put("from", format_url_date(from));
        }
        if let Some(to) = self.to {
            put("to", format_url_date(to));
        }
        if let Some(query) = &self.query {
            put("query", query.clone());
        }
        if let Some(filter_type) = self.filter_type {
            put("filterType", filter_type.as_str().to_string());
        }
        if let Some(fields) = &self.fields {
            put("fields", encode_fields(fields, delimiter));
        }
        if let Some(row_number) = self.row_number {
            put("rowNumber", row_number.to_string());
        }

        map
    }

    /// Reads the whitelisted keys out of `map`, dropping (and returning) the
    /// values that do not parse. Other keys are ignored.
    pub fn parse_map(
        map: &BTreeMap<String, String>,
        delimiter: char,
    ) -> (UrlParams, Vec<UrlParamError>) {
        let mut params = UrlParams::default();
        let mut errors = Vec::new();

        for (key, value) in map {
            let outcome = match key.as_str() {
                "view" => value
                    .parse()
                    .map(|v| params.view = Some(v))
                    .map_err(|e: String| UrlParamError::bad_value("view", value, e)),
                "rows" => parse_rows(value).map(|v| params.rows = Some(v)),
                "page" => parse_page(value).map(|v| params.page = Some(v)),
                "interval" => Preset::from_token(value)
                    .map(|p| params.interval = Some(p))
                    .ok_or_else(|| UrlParamError::UnknownInterval {
                        token: value.clone(),
                    }),
                "from" => parse_url_date(value).map(|v| params.from = Some(v)),
                "to" => parse_url_date(value).map(|v| params.to = Some(v)),
                "query" => {
                    if !value.trim().is_empty() {
                        params.query = Some(value.clone());
                    }
                    Ok(())
                }
                "filterType" => value
                    .parse()
                    .map(|v| params.filter_type = Some(v))
                    .map_err(|e: String| UrlParamError::bad_value("filterType", value, e)),
                "fields" => decode_fields(value, delimiter).map(|v| params.fields = Some(v)),
                "rowNumber" => value
                    .parse()
                    .map(|v| params.row_number = Some(v))
                    .map_err(|e: String| UrlParamError::bad_value("rowNumber", value, e)),
                _ => Ok(()),
            };

            if let Err(err) = outcome {
                debug!(key = %key, error = %err, "dropping url parameter");
                errors.push(err);
            }
        }

        (params, errors)
    }

    pub fn from_map(map: &BTreeMap<String, String>, delimiter: char) -> UrlParams {
        Self::parse_map(map, delimiter).0
    }

    /// `application/x-www-form-urlencoded`, keys in sorted order.
    pub fn to_query_string(&self, delimiter: char) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_map(delimiter))
            .finish()
    }

    /// Accepts a query string with or without the leading `?`. When a key
    /// repeats, the last value wins.
    pub fn parse_query_string(query: &str, delimiter: char) -> (UrlParams, Vec<UrlParamError>) {
        let query = query.trim().trim_start_matches('?');
        let map: BTreeMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self::parse_map(&map, delimiter)
    }

    pub fn from_query_string(query: &str, delimiter: char) -> UrlParams {
        Self::parse_query_string(query, delimiter).0
    }
}

fn parse_rows(value: &str) -> Result<PerPage, UrlParamError> {
    value
        .parse::<usize>()
        .ok()
        .and_then(PerPage::new)
        .ok_or_else(|| {
            UrlParamError::bad_value("rows", value, format!("expected one of {:?}", PerPage::ALLOWED))
        })
}

fn parse_page(value: &str) -> Result<usize, UrlParamError> {
    match value.parse::<usize>() {
        Ok(page) if (1..=MAX_PAGE).contains(&page) => Ok(page),
        Ok(page) if page > MAX_PAGE => Err(UrlParamError::bad_value(
            "page",
            value,
            format!("page is beyond the last addressable page ({MAX_PAGE})"),
        )),
        _ => Err(UrlParamError::bad_value(
            "page",
            value,
            "expected a positive integer",
        )),
    }
}

fn encode_fields(fields: &[String], delimiter: char) -> String {
    fields
        .iter()
        .map(|f| utf8_percent_encode(f, FIELD_ENCODE).to_string())
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

fn decode_fields(value: &str, delimiter: char) -> Result<Vec<String>, UrlParamError> {
    value
        .split(delimiter)
        .filter(|part| !part.is_empty())
        .map(|part| {
            percent_decode_str(part)
                .decode_utf8()
                .map(|s| s.into_owned())
                .map_err(|e| UrlParamError::bad_value("fields", value, e.to_string()))
        })
        .collect()
}
