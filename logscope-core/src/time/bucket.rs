use super::{DAY_MS, HOUR_MS, MINUTE_MS};
use crate::rules::quote_ident;
use serde::Serialize;
use std::fmt;

/// Aggregation bucket width for the time-series (histogram) query.
///
/// Thresholds on the range length, inclusive on the upper bound:
///
/// | range length | bucket       |
/// |--------------|--------------|
/// | <= 60 min    | minute       |
/// | <= 5 h       | quarter-hour |
/// | <= 24 h      | half-hour    |
/// | <= 3 d       | hour         |
/// | <= 30 d      | day          |
/// | otherwise    | month        |
///
/// Any cached chart must use the same table, otherwise bucket boundaries
/// drift between the chart and the rows it summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketInterval {
    Minute,
    QuarterHour,
    HalfHour,
    Hour,
    Day,
    Month,
}

pub fn bucket_interval(duration_ms: i64) -> BucketInterval {
    if duration_ms <= 60 * MINUTE_MS {
        BucketInterval::Minute
    } else if duration_ms <= 5 * HOUR_MS {
        BucketInterval::QuarterHour
    } else if duration_ms <= 24 * HOUR_MS {
        BucketInterval::HalfHour
    } else if duration_ms <= 3 * DAY_MS {
        BucketInterval::Hour
    } else if duration_ms <= 30 * DAY_MS {
        BucketInterval::Day
    } else {
        BucketInterval::Month
    }
}

impl BucketInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketInterval::Minute => "minute",
            BucketInterval::QuarterHour => "quarter-hour",
            BucketInterval::HalfHour => "half-hour",
            BucketInterval::Hour => "hour",
            BucketInterval::Day => "day",
            BucketInterval::Month => "month",
        }
    }

    /// SQL expression that maps `column` onto the start of its bucket.
    pub fn sql_expr(&self, column: &str) -> String {
        let column = quote_ident(column);
        match self {
            BucketInterval::Minute => format!("DATE_TRUNC('minute', {column})"),
            BucketInterval::QuarterHour => date_bin("15 minutes", &column),
            BucketInterval::HalfHour => date_bin("30 minutes", &column),
            BucketInterval::Hour => format!("DATE_TRUNC('hour', {column})"),
            BucketInterval::Day => format!("DATE_TRUNC('day', {column})"),
            BucketInterval::Month => format!("DATE_TRUNC('month', {column})"),
        }
    }
}

fn date_bin(width: &str, column: &str) -> String {
    format!("DATE_BIN(INTERVAL '{width}', {column}, TIMESTAMP '1970-01-01T00:00:00Z')")
}

impl fmt::Display for BucketInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
