use super::ExplorerState;
use crate::window::{ChunkRequest, CountRequest};

/// I/O requested by a transition. The SQL is rendered when the effect is
/// created, so a retry runs exactly the text of the original request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchChunk { request: ChunkRequest, sql: String },
    FetchCount { request: CountRequest, sql: String },
}

impl Effect {
    pub fn sql(&self) -> &str {
        match self {
            Effect::FetchChunk { sql, .. } | Effect::FetchCount { sql, .. } => sql,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: ExplorerState,
    pub effects: Vec<Effect>,
}
