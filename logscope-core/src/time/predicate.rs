use crate::rules::{qualify_ident, quote_ident};
use chrono::{DateTime, SecondsFormat, Utc};

/// Renders the time-range predicate for `column`.
///
/// Both bounds are bound as RFC 3339 strings with millisecond precision.
/// Query assembly, count queries and aggregation queries all call this; no
/// other code formats time bounds into SQL.
pub fn to_sql_predicate(column: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    between(&quote_ident(column), start, end)
}

/// Same predicate with the column qualified by its stream.
pub fn to_qualified_predicate(
    relation: &str,
    column: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> String {
    between(&qualify_ident(relation, column), start, end)
}

fn between(column: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "{column} BETWEEN '{}' AND '{}'",
        start.to_rfc3339_opts(SecondsFormat::Millis, true),
        end.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}
