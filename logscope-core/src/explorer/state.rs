use super::{Command, Effect, FilterMode, RowRange, Transition, ViewMode};
use crate::conf::LogscopeConfig;
use crate::error::ValidationError;
use crate::rules::{
    QueryTree, SelectBuilder, add_rule, build_aggregate, build_count, build_select, compile,
    create_group, delete_rule, is_submittable, set_combinator, update_rule, validate,
    wrap_raw_count, wrap_raw_select,
};
use crate::schema::StreamFieldCatalog;
use crate::source::Row;
use crate::time::{Clock, TimeRange, bucket_interval, resolve_preset};
use crate::url_state::{absolute_page, restore_position};
use crate::window::{ChunkRequest, PageWindow, WindowStatus};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Query text currently backing the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AppliedQuery {
    /// Compiled `WHERE` clause of the rule tree; empty for "everything".
    Filters { clause: String },
    /// User-written query, run as a subquery.
    Sql { text: String },
}

impl AppliedQuery {
    pub fn text(&self) -> &str {
        match self {
            AppliedQuery::Filters { clause } => clause,
            AppliedQuery::Sql { text } => text,
        }
    }

    pub fn mode(&self) -> FilterMode {
        match self {
            AppliedQuery::Filters { .. } => FilterMode::Filters,
            AppliedQuery::Sql { .. } => FilterMode::Sql,
        }
    }
}

/// Everything the single-stream explorer shows, for one stream selection.
///
/// Selecting another stream means building a new state; nothing is carried
/// over.
#[derive(Debug, Clone)]
pub struct ExplorerState {
    catalog: StreamFieldCatalog,
    tree: QueryTree,
    raw_sql: String,
    time_range: TimeRange,
    applied: AppliedQuery,
    window: PageWindow,
    view: ViewMode,
    filter_mode: FilterMode,
    visible_fields: Vec<String>,
    row_range: Option<RowRange>,
    time_column: String,
    clock: Arc<dyn Clock>,
}

/// Runs `command` against a copy of `state`.
///
/// On error the copy is discarded, so the caller's state is never left half
/// updated.
pub fn apply(state: &ExplorerState, command: Command) -> Result<Transition, ValidationError> {
    let mut next = state.clone();
    let effects = next.apply_mut(command)?;
    Ok(Transition {
        state: next,
        effects,
    })
}

impl ExplorerState {
    pub fn new(
        catalog: StreamFieldCatalog,
        time_range: TimeRange,
        config: &LogscopeConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            tree: QueryTree::default(),
            raw_sql: String::new(),
            time_range,
            applied: AppliedQuery::Filters {
                clause: String::new(),
            },
            window: PageWindow::new(config.per_page(), config.load_limit()),
            view: ViewMode::default(),
            filter_mode: FilterMode::default(),
            visible_fields: Vec::new(),
            row_range: None,
            time_column: config.query.time_column.clone(),
            clock,
        }
    }

    /// A state over the configured default interval.
    pub fn with_defaults(
        catalog: StreamFieldCatalog,
        config: &LogscopeConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let time_range = resolve_preset(clock.as_ref(), config.default_preset());
        Self::new(catalog, time_range, config, clock)
    }

    fn apply_mut(&mut self, command: Command) -> Result<Vec<Effect>, ValidationError> {
        debug!(?command, "applying command");

        let effects = match command {
            //-----------------------------------------------------------------
            // Rule tree
            //-----------------------------------------------------------------
            Command::AddGroup => {
                self.tree = create_group(&self.tree, &self.catalog);
                Vec::new()
            }
            Command::AddRule { group } => {
                self.tree = add_rule(&self.tree, &self.catalog, group)?;
                Vec::new()
            }
            Command::DeleteRule { group, rule } => {
                self.tree = delete_rule(&self.tree, group, rule)?;
                Vec::new()
            }
            Command::UpdateRule { group, rule, patch } => {
                self.tree = update_rule(&self.tree, &self.catalog, group, rule, patch)?;
                Vec::new()
            }
            Command::SetCombinator { target, combinator } => {
                self.tree = set_combinator(&self.tree, target, combinator)?;
                Vec::new()
            }
            Command::ApplyFilters => {
                validate(&self.tree)?;
                self.applied = AppliedQuery::Filters {
                    clause: compile(&self.tree, &self.catalog),
                };
                self.filter_mode = FilterMode::Filters;
                self.reload()
            }

            //-----------------------------------------------------------------
            // Raw SQL
            //-----------------------------------------------------------------
            Command::SetRawSql(text) => {
                self.raw_sql = text;
                Vec::new()
            }
            Command::ApplyRawSql => {
                let text = self.raw_sql.trim();
                if text.is_empty() {
                    return Err(ValidationError::EmptyQuery);
                }
                self.applied = AppliedQuery::Sql {
                    text: text.to_string(),
                };
                self.filter_mode = FilterMode::Sql;
                self.reload()
            }
            Command::RestoreQuery(applied) => {
                self.filter_mode = applied.mode();
                if let AppliedQuery::Sql { text } = &applied {
                    self.raw_sql = text.clone();
                }
                self.applied = applied;
                self.reload()
            }
            Command::SetFilterMode(mode) => {
                if mode == FilterMode::Sql && self.raw_sql.trim().is_empty() {
                    self.raw_sql = self.draft_sql();
                }
                self.filter_mode = mode;
                Vec::new()
            }

            //-----------------------------------------------------------------
            // Time range
            //-----------------------------------------------------------------
            Command::SetTimeRange(range) => {
                self.time_range = range;
                self.reload()
            }
            Command::SelectPreset(preset) => {
                self.time_range = resolve_preset(self.clock.as_ref(), preset);
                self.reload()
            }
            Command::Refresh => {
                self.time_range = self.time_range.refreshed(self.clock.as_ref());
                self.reload()
            }

            //-----------------------------------------------------------------
            // Window
            //-----------------------------------------------------------------
            Command::SetFilter { field, values } => {
                self.window.set_filter(&field, values);
                Vec::new()
            }
            Command::ClearFilter { field } => {
                self.window.clear_filter(&field);
                Vec::new()
            }
            Command::SetSort { key, order } => {
                self.window.set_sort(&key, order);
                Vec::new()
            }
            Command::ClearSort => {
                self.window.clear_sort();
                Vec::new()
            }
            Command::SetPerPage(per_page) => {
                self.window.set_per_page(per_page);
                Vec::new()
            }
            Command::GotoPage(page) => {
                self.window.goto_page(page);
                Vec::new()
            }
            Command::AdvanceChunk(direction) => self
                .window
                .advance_chunk(direction)
                .map(|request| self.chunk_effect(request))
                .into_iter()
                .collect(),
            Command::RestorePage(page) => self.restore_page(page)?,
            Command::Retry => self
                .window
                .retry()
                .map(|request| self.chunk_effect(request))
                .into_iter()
                .collect(),

            //-----------------------------------------------------------------
            // Presentation
            //-----------------------------------------------------------------
            Command::SetView(view) => {
                self.view = view;
                Vec::new()
            }
            Command::SetVisibleFields(fields) => {
                let mut visible: Vec<String> = Vec::with_capacity(fields.len());
                for field in fields {
                    if !visible.contains(&field) {
                        visible.push(field);
                    }
                }
                self.visible_fields = visible;
                Vec::new()
            }
            Command::SetRowRange(range) => {
                self.row_range = range;
                Vec::new()
            }
        };

        Ok(effects)
    }

    /// Drops the window and fetches the first chunk and the total count of
    /// the applied query.
    pub(crate) fn reload(&mut self) -> Vec<Effect> {
        self.window.invalidate();
        let chunk = self.window.request_chunk();
        let count = self.window.request_count();
        info!(
            generation = chunk.generation,
            mode = self.applied.mode().as_str(),
            "reloading window"
        );

        vec![
            self.chunk_effect(chunk),
            Effect::FetchCount {
                request: count,
                sql: self.count_sql(),
            },
        ]
    }

    fn restore_page(&mut self, page: usize) -> Result<Vec<Effect>, ValidationError> {
        let position = restore_position(
            page,
            self.window.per_page().get(),
            self.window.load_limit(),
        )
        .ok_or(ValidationError::PageOutOfRange { page })?;

        let same_chunk = position.offset == self.window.chunk_offset()
            && matches!(
                self.window.status(),
                WindowStatus::Loading | WindowStatus::Ready
            );

        if same_chunk {
            self.window.land_on(position.page_in_chunk);
            return Ok(Vec::new());
        }

        let request = self
            .window
            .jump_to(position.offset, position.page_in_chunk);
        Ok(vec![self.chunk_effect(request)])
    }

    fn chunk_effect(&self, request: ChunkRequest) -> Effect {
        Effect::FetchChunk {
            request,
            sql: self.select_sql(request.offset),
        }
    }

    fn draft_sql(&self) -> String {
        SelectBuilder::from_stream(self.catalog.stream_name())
            .with_condition(self.applied_clause())
            .build()
    }

    fn applied_clause(&self) -> &str {
        match &self.applied {
            AppliedQuery::Filters { clause } => clause,
            AppliedQuery::Sql { .. } => "",
        }
    }

    //-------------------------------------------------------------------------
    // Derived SQL
    //-------------------------------------------------------------------------

    /// `WHERE` clause of the tree as currently edited (not necessarily
    /// applied).
    pub fn compiled_where(&self) -> String {
        compile(&self.tree, &self.catalog)
    }

    pub fn time_predicate(&self) -> String {
        self.time_range.sql_predicate(&self.time_column)
    }

    /// Chunk query of the applied query at `offset`.
    pub fn select_sql(&self, offset: usize) -> String {
        let limit = self.window.load_limit();
        match &self.applied {
            AppliedQuery::Filters { clause } => build_select(
                self.catalog.stream_name(),
                clause,
                &self.time_predicate(),
                &[] as &[String],
                &self.time_column,
                limit,
                offset,
            ),
            AppliedQuery::Sql { text } => wrap_raw_select(text, limit, offset),
        }
    }

    /// Chunk query for the chunk currently shown.
    pub fn compiled_sql(&self) -> String {
        self.select_sql(self.window.chunk_offset())
    }

    pub fn count_sql(&self) -> String {
        match &self.applied {
            AppliedQuery::Filters { clause } => build_count(
                self.catalog.stream_name(),
                clause,
                &self.time_predicate(),
            ),
            AppliedQuery::Sql { text } => wrap_raw_count(text),
        }
    }

    /// Aggregation behind the histogram. Not available for raw SQL.
    pub fn histogram_sql(&self) -> Option<String> {
        match &self.applied {
            AppliedQuery::Filters { clause } => Some(build_aggregate(
                self.catalog.stream_name(),
                clause,
                &self.time_predicate(),
                &self.time_column,
                bucket_interval(self.time_range.interval_ms()),
            )),
            AppliedQuery::Sql { .. } => None,
        }
    }

    /// Whether the editor of the current filter mode holds something that
    /// can be applied.
    pub fn submit_enabled(&self) -> bool {
        match self.filter_mode {
            FilterMode::Filters => is_submittable(&self.tree),
            FilterMode::Sql => !self.raw_sql.trim().is_empty(),
        }
    }

    //-------------------------------------------------------------------------
    // Derived page state
    //-------------------------------------------------------------------------

    pub fn page_rows(&self) -> Vec<&Row> {
        self.window.page_rows()
    }

    pub fn display_count(&self) -> usize {
        self.window.display_count()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.window.total_count()
    }

    pub fn total_pages(&self) -> usize {
        self.window.total_pages()
    }

    /// Page number across the whole result set, as written to the URL.
    /// `None` while nothing is displayable.
    pub fn absolute_page(&self) -> Option<usize> {
        match self.window.target_page() {
            0 => None,
            page => Some(absolute_page(
                page,
                self.window.chunk_offset(),
                self.window.per_page().get(),
            )),
        }
    }

    //-------------------------------------------------------------------------
    // Accessors
    //-------------------------------------------------------------------------

    pub fn catalog(&self) -> &StreamFieldCatalog {
        &self.catalog
    }

    pub fn tree(&self) -> &QueryTree {
        &self.tree
    }

    pub fn raw_sql(&self) -> &str {
        &self.raw_sql
    }

    pub fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    pub fn applied(&self) -> &AppliedQuery {
        &self.applied
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub(crate) fn window_mut(&mut self) -> &mut PageWindow {
        &mut self.window
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn visible_fields(&self) -> &[String] {
        &self.visible_fields
    }

    pub fn row_range(&self) -> Option<RowRange> {
        self.row_range
    }

    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
