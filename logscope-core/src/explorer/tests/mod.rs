
use crate::conf::LogscopeConfig;
use crate::explorer::{Effect, ExplorerState, Transition};
use crate::schema::{FieldType, StreamFieldCatalog};
use crate::source::{Row, Scalar};
use crate::time::FixedClock;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

/// Past hour as resolved against [`now`].
pub(super) const PAST_HOUR: &str =
    "\"p_timestamp\" BETWEEN '2024-05-01T11:34:00.000Z' AND '2024-05-01T12:34:00.000Z'";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap()
}

pub(super) fn catalog() -> StreamFieldCatalog {
    StreamFieldCatalog::new(
        "web",
        vec![
            ("p_timestamp".into(), FieldType::Timestamp),
            ("host".into(), FieldType::Text),
            ("status".into(), FieldType::Number),
        ],
    )
}

pub(super) fn state() -> ExplorerState {
    ExplorerState::with_defaults(
        catalog(),
        &LogscopeConfig::default(),
        Arc::new(FixedClock(now())),
    )
}

pub(super) fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let mut row = Row::new();
            row.insert("seq".into(), Scalar::Int(i as i64));
            row.insert(
                "status".into(),
                Scalar::Int(if i % 4 == 0 { 500 } else { 200 }),
            );
            row
        })
        .collect()
}

/// Answers every chunk effect with `n` rows and every count with `n`.
pub(super) fn settle_with(transition: Transition, n: usize) -> ExplorerState {
    let mut state = transition.state;
    for effect in transition.effects {
        match effect {
            Effect::FetchChunk { request, .. } => {
                state.window_mut().ingest_chunk(request, Ok(rows(n)));
            }
            Effect::FetchCount { request, .. } => {
                state.window_mut().ingest_count(request, Ok(n as u64));
            }
        }
    }
    state
}

/// The default state with its first chunk of 1000 rows loaded.
pub(super) fn loaded() -> ExplorerState {
    let mut state = state();
    let effects = state.reload();
    settle_with(Transition { state, effects }, 1000)
}
