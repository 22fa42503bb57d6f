use super::{Clock, Preset, to_qualified_predicate, to_sql_predicate};
use crate::error::ValidationError;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    /// Relative range ("past N"), re-resolved against the clock on refresh.
    Fixed { duration_ms: i64 },
    /// Explicit bounds typed or picked by the user.
    Custom,
}

/// A concrete `[start, end)` pair. `end > start` holds for every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    kind: RangeKind,
}

impl TimeRange {
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    pub fn interval_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }

    /// The preset this range was resolved from, if it is a fixed range whose
    /// duration is in the preset table.
    pub fn preset(&self) -> Option<Preset> {
        match self.kind {
            RangeKind::Fixed { duration_ms } => Preset::from_duration_ms(duration_ms),
            RangeKind::Custom => None,
        }
    }

    pub fn sql_predicate(&self, column: &str) -> String {
        to_sql_predicate(column, self.start, self.end)
    }

    pub fn qualified_sql_predicate(&self, relation: &str, column: &str) -> String {
        to_qualified_predicate(relation, column, self.start, self.end)
    }

    /// Re-resolves a fixed range against `clock`. Custom ranges are returned
    /// unchanged.
    pub fn refreshed(&self, clock: &dyn Clock) -> TimeRange {
        match self.kind {
            RangeKind::Fixed { duration_ms } => resolve_fixed(clock, duration_ms).unwrap_or(*self),
            RangeKind::Custom => *self,
        }
    }
}

/// `end` is now truncated to the minute, `start` is `end - duration_ms`.
pub fn resolve_fixed(clock: &dyn Clock, duration_ms: i64) -> Result<TimeRange, ValidationError> {
    let end = truncate_to_minute(clock.now());
    if duration_ms <= 0 {
        return Err(invalid_range(end, end));
    }

    let start = TimeDelta::try_milliseconds(duration_ms)
        .and_then(|delta| end.checked_sub_signed(delta))
        .ok_or_else(|| {
            let end = end.to_rfc3339_opts(SecondsFormat::Secs, true);
            ValidationError::InvalidRange {
                start: format!("{duration_ms}ms before {end}"),
                end,
            }
        })?;

    Ok(TimeRange {
        start,
        end,
        kind: RangeKind::Fixed { duration_ms },
    })
}

pub fn resolve_preset(clock: &dyn Clock, preset: Preset) -> TimeRange {
    let end = truncate_to_minute(clock.now());

    TimeRange {
        start: end
            .checked_sub_signed(TimeDelta::milliseconds(preset.duration_ms))
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
        end,
        kind: RangeKind::Fixed {
            duration_ms: preset.duration_ms,
        },
    }
}

pub fn resolve_custom(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<TimeRange, ValidationError> {
    if end <= start {
        return Err(invalid_range(start, end));
    }

    Ok(TimeRange {
        start,
        end,
        kind: RangeKind::Custom,
    })
}

fn invalid_range(start: DateTime<Utc>, end: DateTime<Utc>) -> ValidationError {
    ValidationError::InvalidRange {
        start: start.to_rfc3339_opts(SecondsFormat::Secs, true),
        end: end.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

fn truncate_to_minute(now: DateTime<Utc>) -> DateTime<Utc> {
    let secs = now.timestamp();
    DateTime::<Utc>::from_timestamp(secs - secs.rem_euclid(60), 0).unwrap_or(now)
}
