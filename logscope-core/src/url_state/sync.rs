use super::{UrlParamError, UrlParams};
use crate::conf::LogscopeConfig;
use crate::explorer::{AppliedQuery, Command, Effect, ExplorerState, FilterMode, Transition, apply};
use crate::time::{RangeKind, resolve_custom};
use tracing::debug;

/// Maps [`ExplorerState`] to [`UrlParams`] and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlSync {
    field_delimiter: char,
}

impl Default for UrlSync {
    fn default() -> Self {
        Self::new(',')
    }
}

impl UrlSync {
    pub fn new(field_delimiter: char) -> Self {
        Self { field_delimiter }
    }

    pub fn from_config(config: &LogscopeConfig) -> Self {
        Self::new(config.field_delimiter())
    }

    pub fn field_delimiter(&self) -> char {
        self.field_delimiter
    }

    pub fn parse(&self, query_string: &str) -> (UrlParams, Vec<UrlParamError>) {
        UrlParams::parse_query_string(query_string, self.field_delimiter)
    }

    pub fn encode(&self, params: &UrlParams) -> String {
        params.to_query_string(self.field_delimiter)
    }

    /// The externally significant part of `state`.
    ///
    /// A relative range whose duration is a preset is written as `interval`;
    /// every other range as `from` and `to`.
    pub fn params_from_state(&self, state: &ExplorerState) -> UrlParams {
        let range = state.time_range();
        let interval = range.preset();
        let (from, to) = match (interval, range.kind()) {
            (Some(_), RangeKind::Fixed { .. }) => (None, None),
            _ => (Some(range.start()), Some(range.end())),
        };

        let applied = state.applied();
        let query = Some(applied.text())
            .filter(|q| !q.trim().is_empty())
            .map(str::to_string);

        UrlParams {
            view: Some(state.view()),
            rows: Some(state.window().per_page()),
            page: state.absolute_page(),
            interval,
            from,
            to,
            query,
            filter_type: Some(applied.mode()),
            fields: Some(state.visible_fields().to_vec()).filter(|f| !f.is_empty()),
            row_number: state.row_range(),
        }
    }

    /// Store to URL. Returns the params to write, or `None` when `current`
    /// already matches the state.
    pub fn store_to_url(&self, state: &ExplorerState, current: &UrlParams) -> Option<UrlParams> {
        let next = self.params_from_state(state);
        if &next == current {
            return None;
        }
        Some(next)
    }

    /// URL to store.
    ///
    /// Only values that differ from `state` are applied, in dependency order:
    /// time range and query first (they reload the window), then page size,
    /// then page. Values that cannot be applied are skipped and the
    /// previous state is kept for them. Fetches superseded within the same
    /// pass are left out of the returned effects.
    pub fn url_to_store(&self, state: &ExplorerState, params: &UrlParams) -> Transition {
        let mut current = state.clone();
        let mut effects: Vec<Effect> = Vec::new();

        let mut step = |current: &mut ExplorerState, command: Command| {
            match apply(current, command) {
                Ok(transition) => {
                    *current = transition.state;
                    effects.extend(transition.effects);
                }
                Err(err) => debug!(error = %err, "url value not applied"),
            }
        };

        if let Some(view) = params.view.filter(|v| *v != current.view()) {
            step(&mut current, Command::SetView(view));
        }

        if let Some(preset) = params.interval {
            if current.time_range().preset() != Some(preset) {
                step(&mut current, Command::SelectPreset(preset));
            }
        } else if let (Some(from), Some(to)) = (params.from, params.to) {
            match resolve_custom(from, to) {
                Ok(range) if range != *current.time_range() => {
                    step(&mut current, Command::SetTimeRange(range));
                }
                Ok(_) => {}
                Err(err) => debug!(error = %err, "url time range not applied"),
            }
        }

        if let Some(query) = &params.query {
            let mode = params.filter_type.unwrap_or(current.applied().mode());
            let applied = match mode {
                FilterMode::Filters => AppliedQuery::Filters {
                    clause: query.clone(),
                },
                FilterMode::Sql => AppliedQuery::Sql {
                    text: query.clone(),
                },
            };
            if applied != *current.applied() {
                step(&mut current, Command::RestoreQuery(applied));
            }
        } else if let Some(mode) = params.filter_type.filter(|m| *m != current.filter_mode()) {
            step(&mut current, Command::SetFilterMode(mode));
        }

        if let Some(rows) = params.rows.filter(|r| *r != current.window().per_page()) {
            step(&mut current, Command::SetPerPage(rows));
        }

        if let Some(page) = params.page.filter(|p| Some(*p) != current.absolute_page()) {
            step(&mut current, Command::RestorePage(page));
        }

        if let Some(fields) = params
            .fields
            .as_ref()
            .filter(|f| f.as_slice() != current.visible_fields())
        {
            step(&mut current, Command::SetVisibleFields(fields.clone()));
        }

        if let Some(range) = params.row_number.filter(|r| Some(*r) != current.row_range()) {
            step(&mut current, Command::SetRowRange(Some(range)));
        }

        let effects = prune_superseded(effects, &current);
        Transition {
            state: current,
            effects,
        }
    }
}

/// Keeps only the fetches the window will still accept: the last chunk
/// request it issued and count requests of its current generation.
fn prune_superseded(effects: Vec<Effect>, state: &ExplorerState) -> Vec<Effect> {
    let window = state.window();
    effects
        .into_iter()
        .filter(|effect| match effect {
            Effect::FetchChunk { request, .. } => window.last_request() == Some(*request),
            Effect::FetchCount { request, .. } => request.generation == window.generation(),
        })
        .collect()
}
