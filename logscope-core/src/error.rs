use thiserror::Error;

/// Local, recoverable errors. They block the triggering action and are
/// surfaced inline; the state they were raised against is left untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    //-------------------------------------------------------------------------
    // Rules
    //-------------------------------------------------------------------------
    #[error("rule on field '{field}' requires a value")]
    EmptyRuleValue { field: String },

    #[error("unknown field '{field}' in stream '{stream}'")]
    UnknownField { stream: String, field: String },

    #[error("unknown rule group '{group}'")]
    UnknownGroup { group: String },

    #[error("unknown rule '{rule}'")]
    UnknownRule { rule: String },

    #[error("operator '{operator}' is not allowed on field '{field}'")]
    IllegalOperator { field: String, operator: String },

    #[error("value '{value}' for field '{field}' is not a number")]
    NotANumber { field: String, value: String },

    #[error("value '{value}' for field '{field}' is not a boolean")]
    NotABoolean { field: String, value: String },

    #[error("query text is empty")]
    EmptyQuery,

    //-------------------------------------------------------------------------
    // Pagination
    //-------------------------------------------------------------------------
    #[error("page {page} is beyond the last addressable page")]
    PageOutOfRange { page: usize },

    //-------------------------------------------------------------------------
    // Time
    //-------------------------------------------------------------------------
    #[error("invalid time range: end ({end}) must be after start ({start})")]
    InvalidRange { start: String, end: String },

    //-------------------------------------------------------------------------
    // Correlation
    //-------------------------------------------------------------------------
    #[error("cannot join '{left}' ({left_type}) with '{right}' ({right_type})")]
    IncompatibleJoinTypes {
        left: String,
        left_type: String,
        right: String,
        right_type: String,
    },

    #[error("list field '{field}' cannot be used as a join key")]
    ListJoinField { field: String },

    #[error("unknown stream '{stream}'")]
    UnknownStream { stream: String },

    #[error("stream '{stream}' is already selected")]
    DuplicateStream { stream: String },

    #[error("at most two streams can be correlated")]
    TooManyStreams,

    #[error("a join needs two streams")]
    MissingStream,

    #[error("no join condition declared")]
    NoJoinCondition,

    #[error("streams are not joined")]
    NotJoined,
}

/// Errors reported by a [`LogSource`](crate::source::LogSource).
///
/// A failed fetch only marks the window it was issued for.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("query failed: {message}")]
    Transient { message: String },

    #[error("request was cancelled")]
    Cancelled,

    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl FetchError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}
