mod sync_tests;

use crate::conf::LogscopeConfig;
use crate::explorer::{Command, Effect, ExplorerState, Transition, apply};
use crate::schema::{FieldType, StreamFieldCatalog};
use crate::source::{Row, Scalar};
use crate::time::FixedClock;
use chrono::{TimeZone, Utc};
use std::sync::Arc;

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

fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let mut row = Row::new();
            row.insert("seq".into(), Scalar::Int(i as i64));
            row.insert("host".into(), Scalar::Text(format!("h{}", i % 3)));
            row
        })
        .collect()
}

/// Feeds every effect a full chunk and a count of 5000.
pub(super) fn settle(transition: Transition) -> ExplorerState {
    let mut state = transition.state;
    for effect in transition.effects {
        match effect {
            Effect::FetchChunk { request, .. } => {
                state.window_mut().ingest_chunk(request, Ok(rows(request.limit)));
            }
            Effect::FetchCount { request, .. } => {
                state.window_mut().ingest_count(request, Ok(5000));
            }
        }
    }
    state
}

/// Default state over the past hour, first chunk loaded.
pub(super) fn loaded_state() -> ExplorerState {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap());
    let mut state = ExplorerState::with_defaults(catalog(), &LogscopeConfig::default(), Arc::new(clock));
    let effects = state.reload();
    settle(Transition { state, effects })
}

pub(super) fn run(state: &ExplorerState, commands: Vec<Command>) -> ExplorerState {
    commands.into_iter().fold(state.clone(), |state, command| {
        settle(apply(&state, command).unwrap())
    })
}
