
use crate::correlation::{
    CorrelationCommand, CorrelationState, CorrelationTransition, StreamEffect, apply,
};
use crate::explorer::Effect;
use crate::schema::{FieldType, StreamFieldCatalog};
use crate::source::{Row, Scalar};
use crate::time::{TimeRange, resolve_custom};
use crate::window::{ChunkRequest, PerPage};
use chrono::{TimeZone, Utc};

pub(super) fn web() -> StreamFieldCatalog {
    StreamFieldCatalog::new(
        "web",
        vec![
            ("p_timestamp".into(), FieldType::Timestamp),
            ("host".into(), FieldType::Text),
            ("status".into(), FieldType::Number),
            ("tags".into(), FieldType::List),
        ],
    )
}

pub(super) fn auth() -> StreamFieldCatalog {
    StreamFieldCatalog::new(
        "auth",
        vec![
            ("p_timestamp".into(), FieldType::Timestamp),
            ("host".into(), FieldType::Text),
            ("code".into(), FieldType::Number),
            ("user".into(), FieldType::Text),
        ],
    )
}

pub(super) fn range() -> TimeRange {
    resolve_custom(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap(),
    )
    .unwrap()
}

pub(super) fn state() -> CorrelationState {
    CorrelationState::new(range(), "p_timestamp", PerPage::default(), 1000)
}

pub(super) fn row(pairs: &[(&str, Scalar)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub(super) fn step(state: &CorrelationState, command: CorrelationCommand) -> CorrelationTransition {
    apply(state, command).unwrap()
}

pub(super) fn chunk_request(effect: &StreamEffect) -> ChunkRequest {
    match &effect.effect {
        Effect::FetchChunk { request, .. } => *request,
        other => panic!("expected a chunk fetch, got {other:?}"),
    }
}

/// Feeds `rows` to every chunk fetch in `effects` and `total` to every count.
pub(super) fn settle(
    state: &mut CorrelationState,
    effects: &[StreamEffect],
    rows: impl Fn(&str) -> Vec<Row>,
    total: u64,
) {
    for effect in effects {
        match &effect.effect {
            Effect::FetchChunk { request, .. } => {
                state.ingest_chunk(&effect.stream, *request, Ok(rows(&effect.stream)));
            }
            Effect::FetchCount { request, .. } => {
                state.ingest_count(&effect.stream, *request, Ok(total));
            }
        }
    }
}
