use super::quote_ident;
use crate::time::BucketInterval;

/// Assembles a `SELECT` statement from already-rendered parts.
///
/// The time predicate comes first in the `WHERE` clause; every additional
/// condition is appended as `AND (<condition>)`. Empty conditions are
/// skipped, so `AND ()` is never produced.
///
/// ```
/// use logscope_core::rules::SelectBuilder;
///
/// let sql = SelectBuilder::from_stream("web")
///     .with_time_predicate("\"p_timestamp\" BETWEEN 'a' AND 'b'")
///     .with_condition("\"status\" = 500")
///     .order_by_desc("p_timestamp")
///     .with_limit(1000)
///     .with_offset(0)
///     .build();
///
/// assert_eq!(
///     sql,
///     "SELECT * FROM \"web\" WHERE \"p_timestamp\" BETWEEN 'a' AND 'b' AND (\"status\" = 500) \
///      ORDER BY \"p_timestamp\" DESC LIMIT 1000 OFFSET 0"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    relations: Vec<String>,
    projection: Vec<String>,
    time_predicate: Option<String>,
    conditions: Vec<String>,
    group_by: Option<String>,
    order_by: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl SelectBuilder {
    pub fn from_stream(stream: &str) -> Self {
        Self {
            relations: vec![quote_ident(stream)],
            ..Self::default()
        }
    }

    /// Adds another relation to the `FROM` list. Used by correlation, where
    /// the join equality is pushed into the `WHERE` clause.
    pub fn and_stream(mut self, stream: &str) -> Self {
        self.relations.push(quote_ident(stream));
        self
    }

    /// Projects plain field names, quoted. An empty list selects `*`.
    pub fn project_fields<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.projection
            .extend(fields.iter().map(|f| quote_ident(f.as_ref())));
        self
    }

    /// Projects a pre-rendered expression.
    pub fn project_expr(mut self, expr: impl Into<String>) -> Self {
        self.projection.push(expr.into());
        self
    }

    pub fn with_time_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.time_predicate = Some(predicate.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        let condition = condition.into();
        if !condition.trim().is_empty() {
            self.conditions.push(condition);
        }
        self
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_by = Some(expr.into());
        self
    }

    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by = Some(format!("{} DESC", quote_ident(column)));
        self
    }

    pub fn order_by_expr(mut self, expr: impl Into<String>) -> Self {
        self.order_by = Some(expr.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn build(self) -> String {
        let projection = if self.projection.is_empty() {
            "*".to_string()
        } else {
            self.projection.join(", ")
        };

        let mut sql = format!("SELECT {projection} FROM {}", self.relations.join(", "));

        let mut predicates: Vec<String> = Vec::new();
        if let Some(time) = self.time_predicate {
            predicates.push(time);
        }
        predicates.extend(self.conditions.into_iter().map(|c| format!("({c})")));

        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        if let Some(group_by) = self.group_by {
            sql.push_str(&format!(" GROUP BY {group_by}"));
        }

        if let Some(order_by) = self.order_by {
            sql.push_str(&format!(" ORDER BY {order_by}"));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        sql
    }
}

/// `SELECT <fields> FROM "<stream>" WHERE <time> [AND (<where>)] ORDER BY
/// "<time column>" DESC LIMIT <limit> OFFSET <offset>`.
pub fn build_select<S: AsRef<str>>(
    stream: &str,
    where_clause: &str,
    time_predicate: &str,
    projected_fields: &[S],
    time_column: &str,
    limit: usize,
    offset: usize,
) -> String {
    SelectBuilder::from_stream(stream)
        .project_fields(projected_fields)
        .with_time_predicate(time_predicate)
        .with_condition(where_clause)
        .order_by_desc(time_column)
        .with_limit(limit)
        .with_offset(offset)
        .build()
}

/// Exact row count of the whole query, independent of chunking.
pub fn build_count(stream: &str, where_clause: &str, time_predicate: &str) -> String {
    SelectBuilder::from_stream(stream)
        .project_expr("COUNT(*) AS count")
        .with_time_predicate(time_predicate)
        .with_condition(where_clause)
        .build()
}

/// Time-series aggregation used by the histogram chart.
pub fn build_aggregate(
    stream: &str,
    where_clause: &str,
    time_predicate: &str,
    time_column: &str,
    bucket: BucketInterval,
) -> String {
    SelectBuilder::from_stream(stream)
        .project_expr(format!("{} AS bucket", bucket.sql_expr(time_column)))
        .project_expr("COUNT(*) AS count")
        .with_time_predicate(time_predicate)
        .with_condition(where_clause)
        .group_by("bucket")
        .order_by_expr("bucket ASC")
        .build()
}

/// Pages over a user-written query in SQL mode.
pub fn wrap_raw_select(text: &str, limit: usize, offset: usize) -> String {
    format!(
        "SELECT * FROM ({}) AS q LIMIT {limit} OFFSET {offset}",
        strip_terminator(text)
    )
}

pub fn wrap_raw_count(text: &str) -> String {
    format!(
        "SELECT COUNT(*) AS count FROM ({}) AS q",
        strip_terminator(text)
    )
}

fn strip_terminator(text: &str) -> &str {
    text.trim().trim_end_matches(';').trim_end()
}
