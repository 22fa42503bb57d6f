use super::{DAY_MS, HOUR_MS, MINUTE_MS};

/// A relative time range offered to the user and the only durations that
/// may appear in the `interval` URL parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub token: &'static str,
    pub duration_ms: i64,
    pub label: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset { token: "1m", duration_ms: MINUTE_MS, label: "Past 1 minute" },
    Preset { token: "5m", duration_ms: 5 * MINUTE_MS, label: "Past 5 minutes" },
    Preset { token: "15m", duration_ms: 15 * MINUTE_MS, label: "Past 15 minutes" },
    Preset { token: "30m", duration_ms: 30 * MINUTE_MS, label: "Past 30 minutes" },
    Preset { token: "1h", duration_ms: HOUR_MS, label: "Past 1 hour" },
    Preset { token: "3h", duration_ms: 3 * HOUR_MS, label: "Past 3 hours" },
    Preset { token: "6h", duration_ms: 6 * HOUR_MS, label: "Past 6 hours" },
    Preset { token: "12h", duration_ms: 12 * HOUR_MS, label: "Past 12 hours" },
    Preset { token: "1d", duration_ms: DAY_MS, label: "Past 1 day" },
    Preset { token: "3d", duration_ms: 3 * DAY_MS, label: "Past 3 days" },
    Preset { token: "7d", duration_ms: 7 * DAY_MS, label: "Past 7 days" },
    Preset { token: "30d", duration_ms: 30 * DAY_MS, label: "Past 30 days" },
];

impl Preset {
    pub fn from_token(token: &str) -> Option<Preset> {
        PRESETS.iter().copied().find(|p| p.token == token)
    }

    pub fn from_duration_ms(duration_ms: i64) -> Option<Preset> {
        PRESETS.iter().copied().find(|p| p.duration_ms == duration_ms)
    }
}
