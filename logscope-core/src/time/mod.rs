//! Time range resolution.
//!
//! Every row-level query, count query and aggregation query is bounded by a
//! [`TimeRange`]. This module is the single place that turns user intent
//! ("past hour", or explicit bounds) into concrete instants, and the single
//! producer of the SQL time predicate built from them.

mod bucket;
mod clock;
mod predicate;
mod preset;
mod range;


pub use bucket::{BucketInterval, bucket_interval};
pub use clock::{Clock, FixedClock, SystemClock};
pub use predicate::{to_qualified_predicate, to_sql_predicate};
pub use preset::{PRESETS, Preset};
pub use range::{RangeKind, TimeRange, resolve_custom, resolve_fixed, resolve_preset};

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;
