use super::{CorrelationCommand, CorrelationState, StreamEffect, apply};
use crate::error::{FetchError, ValidationError};
use crate::explorer::Effect;
use crate::schema::StreamFieldCatalog;
use crate::source::LogSource;
use tracing::debug;

/// Runs a [`CorrelationState`] against a [`LogSource`], one effect at a time.
pub struct CorrelationDriver<S: LogSource> {
    source: S,
    state: CorrelationState,
}

impl<S: LogSource> CorrelationDriver<S> {
    pub fn new(source: S, state: CorrelationState) -> Self {
        Self { source, state }
    }

    pub fn state(&self) -> &CorrelationState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_state(self) -> CorrelationState {
        self.state
    }

    /// Field catalog of `stream`, ready for
    /// [`CorrelationCommand::AddStream`].
    pub async fn catalog(&self, stream: &str) -> Result<StreamFieldCatalog, FetchError> {
        let schema = self.source.fetch_schema(stream).await?;
        Ok(StreamFieldCatalog::from_declared(stream, &schema))
    }

    /// Applies `command` and runs the fetches it produced. A rejected
    /// command leaves the state untouched.
    pub async fn dispatch(&mut self, command: CorrelationCommand) -> Result<(), ValidationError> {
        let transition = apply(&self.state, command)?;
        self.state = transition.state;
        self.run(transition.effects).await;
        Ok(())
    }

    pub async fn run(&mut self, effects: Vec<StreamEffect>) {
        for effect in effects {
            self.execute(effect).await;
        }
    }

    async fn execute(&mut self, StreamEffect { stream, effect }: StreamEffect) {
        match effect {
            Effect::FetchChunk { request, sql } => {
                debug!(%stream, offset = request.offset, %sql, "executing chunk query");
                let result = self.source.execute_query(&sql).await;
                self.state.ingest_chunk(&stream, request, result);
            }
            Effect::FetchCount { request, sql } => {
                debug!(%stream, %sql, "executing count query");
                let result = self.source.execute_count(&sql).await;
                self.state.ingest_count(&stream, request, result);
            }
        }
    }
}
