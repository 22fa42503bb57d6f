use thiserror::Error;

/// A URL parameter that could not be read. These never reach the explorer
/// state: the parameter is dropped and the current value kept.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlParamError {
    #[error("'{token}' is not a known interval")]
    UnknownInterval { token: String },

    #[error("'{value}' is not a date in DD-MMM-YYYY_HH-mm+ZZZZ form")]
    BadDate { value: String },

    #[error("invalid value '{value}' for '{key}': {reason}")]
    BadValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl UrlParamError {
    pub(crate) fn bad_value(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::BadValue {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
