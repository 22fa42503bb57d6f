//! Data source seam.
//!
//! The core never executes SQL itself. Everything that needs the backend goes
//! through [`LogSource`], which the surrounding application implements on top
//! of its HTTP client (and its retry/caching layer).

mod row;

pub use row::{Row, Scalar};

use crate::error::FetchError;
use async_trait::async_trait;

/// Declared field types as returned by a schema fetch, as `(field, type)` pairs.
///
/// Values are the backend's type names (`Utf8`, `Int64`,
/// `Timestamp(Millisecond, None)`, ...).
pub type DeclaredSchema = Vec<(String, String)>;

#[async_trait]
pub trait LogSource: Send + Sync {
    /// Run a row-level query and return every row it produced.
    async fn execute_query(&self, sql: &str) -> Result<Vec<Row>, FetchError>;

    /// Run a `COUNT(*)` query and return the count.
    async fn execute_count(&self, sql: &str) -> Result<u64, FetchError>;

    /// Fetch the declared schema of a stream, in schema order.
    async fn fetch_schema(&self, stream: &str) -> Result<DeclaredSchema, FetchError>;
}

/// Reads the count out of the first row of a `COUNT(*) AS count` response.
///
/// Backends that return the count as a row rather than a bare number can use
/// this from their [`LogSource::execute_count`] implementation.
pub fn count_from_rows(rows: &[Row]) -> Result<u64, FetchError> {
    let first = rows
        .first()
        .ok_or_else(|| FetchError::decode("count query returned no rows"))?;

    match first.get("count") {
        Some(Scalar::Int(n)) if *n >= 0 => Ok(*n as u64),
        Some(Scalar::Float(f)) if *f >= 0.0 => Ok(*f as u64),
        Some(Scalar::Text(s)) => s
            .parse::<u64>()
            .map_err(|_| FetchError::decode(format!("count '{s}' is not an integer"))),
        other => Err(FetchError::decode(format!(
            "unexpected count value: {other:?}"
        ))),
    }
}

