use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use logscope_core::FetchError;
use logscope_core::source::{DeclaredSchema, LogSource, Row, Scalar};
use logscope_core::time::FixedClock;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Query(String),
    Count(String),
    Schema(String),
}

impl SourceCall {
    pub fn sql(&self) -> Option<&str> {
        match self {
            SourceCall::Query(sql) | SourceCall::Count(sql) => Some(sql),
            SourceCall::Schema(_) => None,
        }
    }
}

struct Stream {
    schema: DeclaredSchema,
    rows: Vec<Row>,
}

/// In-memory backend. Row queries are answered with the `LIMIT`/`OFFSET`
/// slice of the stream they select from; no filtering is evaluated. Counts
/// return the stream's row count.
#[derive(Default)]
pub struct MemorySource {
    streams: BTreeMap<String, Stream>,
    failures: Mutex<VecDeque<FetchError>>,
    calls: Mutex<Vec<SourceCall>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stream. `schema` holds backend type names (`Int64`,
    /// `Utf8`, ...).
    pub fn with_stream(mut self, name: &str, schema: &[(&str, &str)], rows: Vec<Row>) -> Self {
        self.streams.insert(
            name.to_string(),
            Stream {
                schema: schema
                    .iter()
                    .map(|(f, t)| (f.to_string(), t.to_string()))
                    .collect(),
                rows,
            },
        );
        self
    }

    /// The next row or count query fails with `error`.
    pub fn fail_next(&self, error: FetchError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SourceCall::Query(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: SourceCall) -> Result<(), FetchError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn stream_for(&self, sql: &str) -> Result<&Stream, FetchError> {
        let name = target_stream(sql)
            .or_else(|| self.streams.keys().next().cloned())
            .unwrap_or_default();
        self.streams
            .get(&name)
            .ok_or_else(|| FetchError::transient(format!("no such stream '{name}'")))
    }
}

#[async_trait]
impl LogSource for MemorySource {
    async fn execute_query(&self, sql: &str) -> Result<Vec<Row>, FetchError> {
        self.record(SourceCall::Query(sql.to_string()))?;
        let stream = self.stream_for(sql)?;
        let (limit, offset) = paging(sql);
        Ok(stream.rows.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn execute_count(&self, sql: &str) -> Result<u64, FetchError> {
        self.record(SourceCall::Count(sql.to_string()))?;
        Ok(self.stream_for(sql)?.rows.len() as u64)
    }

    async fn fetch_schema(&self, stream: &str) -> Result<DeclaredSchema, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push(SourceCall::Schema(stream.to_string()));
        self.streams
            .get(stream)
            .map(|s| s.schema.clone())
            .ok_or_else(|| FetchError::transient(format!("no such stream '{stream}'")))
    }
}

/// `SELECT "s".* FROM ...` selects from `s`; otherwise the first quoted
/// relation after `FROM`.
fn target_stream(sql: &str) -> Option<String> {
    if let Some(rest) = sql.strip_prefix("SELECT \"") {
        if let Some((name, tail)) = rest.split_once('"') {
            if tail.starts_with(".*") {
                return Some(name.to_string());
            }
        }
    }

    let (_, after) = sql.split_once("FROM \"")?;
    after.split_once('"').map(|(name, _)| name.to_string())
}

fn paging(sql: &str) -> (usize, usize) {
    let tokens: Vec<&str> = sql.split_whitespace().collect();
    let after = |keyword: &str| {
        tokens
            .iter()
            .rposition(|t| *t == keyword)
            .and_then(|i| tokens.get(i + 1))
            .and_then(|t| t.parse().ok())
    };
    (after("LIMIT").unwrap_or(usize::MAX), after("OFFSET").unwrap_or(0))
}

/// `n` rows of a web-access-like stream: `seq`, `host` (`h0`..`h2`) and
/// `status` (500 for every fourth row, 200 otherwise).
pub fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let mut row = Row::new();
            row.insert("seq".into(), Scalar::Int(i as i64));
            row.insert("host".into(), Scalar::Text(format!("h{}", i % 3)));
            row.insert(
                "status".into(),
                Scalar::Int(if i % 4 == 0 { 500 } else { 200 }),
            );
            row
        })
        .collect()
}

/// 2024-05-01T12:34:56Z.
pub fn fixed_clock() -> FixedClock {
    FixedClock(now())
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap()
}
