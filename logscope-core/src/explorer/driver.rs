use super::{Command, Effect, ExplorerState, apply};
use crate::conf::LogscopeConfig;
use crate::error::{FetchError, ValidationError};
use crate::schema::StreamFieldCatalog;
use crate::source::LogSource;
use crate::time::Clock;
use crate::url_state::{UrlParams, UrlSync};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs an [`ExplorerState`] against a [`LogSource`].
///
/// Effects are executed in order and their responses ingested right away.
/// A response the window no longer wants (older generation or offset) is
/// dropped by the window itself.
pub struct Driver<S: LogSource> {
    source: S,
    state: ExplorerState,
}

impl<S: LogSource> Driver<S> {
    pub fn new(source: S, state: ExplorerState) -> Self {
        Self { source, state }
    }

    /// Selects `stream`: fetches its schema, then loads the first chunk of
    /// the configured default interval.
    pub async fn open(
        source: S,
        stream: &str,
        config: &LogscopeConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FetchError> {
        let schema = source.fetch_schema(stream).await?;
        let catalog = StreamFieldCatalog::from_declared(stream, &schema);
        info!(stream, fields = catalog.len(), "stream selected");

        let mut driver = Self::new(source, ExplorerState::with_defaults(catalog, config, clock));
        let effects = driver.state.reload();
        driver.run(effects).await;
        Ok(driver)
    }

    pub fn state(&self) -> &ExplorerState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_state(self) -> ExplorerState {
        self.state
    }

    /// Applies `command` and runs the effects it produced.
    ///
    /// A rejected command leaves the state untouched.
    pub async fn dispatch(&mut self, command: Command) -> Result<(), ValidationError> {
        let transition = apply(&self.state, command)?;
        self.state = transition.state;
        self.run(transition.effects).await;
        Ok(())
    }

    /// Brings the state in line with a parsed URL. Never fails: values that
    /// do not apply are skipped.
    pub async fn restore(&mut self, sync: &UrlSync, params: &UrlParams) {
        let transition = sync.url_to_store(&self.state, params);
        self.state = transition.state;
        self.run(transition.effects).await;
    }

    pub async fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.execute(effect).await;
        }
    }

    async fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::FetchChunk { request, sql } => {
                debug!(offset = request.offset, %sql, "executing chunk query");
                let result = self.source.execute_query(&sql).await;
                self.state.window_mut().ingest_chunk(request, result);
            }
            Effect::FetchCount { request, sql } => {
                debug!(%sql, "executing count query");
                let result = self.source.execute_count(&sql).await;
                self.state.window_mut().ingest_count(request, result);
            }
        }
    }
}
