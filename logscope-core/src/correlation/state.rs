use super::{
    CorrelationCommand, CorrelationTransition, JoinCondition, StreamEffect, check_join,
    join_predicate, project, zip_rows,
};
use crate::error::{FetchError, ValidationError};
use crate::explorer::Effect;
use crate::rules::{
    QueryTree, SelectBuilder, build_count, build_select, compile, compile_qualified,
    qualify_ident, quote_ident, validate,
};
use crate::schema::StreamFieldCatalog;
use crate::source::Row;
use crate::time::TimeRange;
use crate::window::{ChunkRequest, CountRequest, PageWindow, PerPage};
use tracing::{debug, info};

pub const MAX_STREAMS: usize = 2;

#[derive(Debug, Clone)]
struct StreamSlot {
    catalog: StreamFieldCatalog,
    window: PageWindow,
    tree: QueryTree,
    selected: Vec<String>,
}

impl StreamSlot {
    fn name(&self) -> &str {
        self.catalog.stream_name()
    }
}

/// Up to two streams, a join condition between them and the fields projected
/// into joined rows.
///
/// The first stream added is the left side of the join. Removing a stream or
/// clearing the join drops the condition, every field selection and the
/// joined flag together, so no condition can outlive the streams it names.
#[derive(Debug, Clone)]
pub struct CorrelationState {
    slots: Vec<StreamSlot>,
    join: Option<JoinCondition>,
    is_joined: bool,
    time_range: TimeRange,
    time_column: String,
    per_page: PerPage,
    load_limit: usize,
}

/// Applies `command` to a copy of `state`.
///
/// On error the caller keeps `state` as it was; nothing is half-applied.
pub fn apply(
    state: &CorrelationState,
    command: CorrelationCommand,
) -> Result<CorrelationTransition, ValidationError> {
    let mut next = state.clone();
    let effects = next.apply_mut(command)?;
    Ok(CorrelationTransition {
        state: next,
        effects,
    })
}

impl CorrelationState {
    pub fn new(
        time_range: TimeRange,
        time_column: impl Into<String>,
        per_page: PerPage,
        load_limit: usize,
    ) -> Self {
        Self {
            slots: Vec::with_capacity(MAX_STREAMS),
            join: None,
            is_joined: false,
            time_range,
            time_column: time_column.into(),
            per_page,
            load_limit,
        }
    }

    fn apply_mut(
        &mut self,
        command: CorrelationCommand,
    ) -> Result<Vec<StreamEffect>, ValidationError> {
        debug!(?command, "applying correlation command");

        let effects = match command {
            CorrelationCommand::AddStream(catalog) => self.add_stream(catalog)?,
            CorrelationCommand::RemoveStream { stream } => self.remove_stream(&stream)?,

            CorrelationCommand::SelectField { stream, field } => {
                self.select_field(&stream, &field)?;
                Vec::new()
            }
            CorrelationCommand::DeselectField { stream, field } => {
                self.slot_mut(&stream)?.selected.retain(|f| *f != field);
                Vec::new()
            }

            CorrelationCommand::SetJoinCondition {
                left_field,
                right_field,
            } => self.set_join_condition(&left_field, &right_field)?,
            CorrelationCommand::Correlate => {
                self.join_legality()?;
                self.is_joined = true;
                info!(predicate = ?self.join_predicate(), "streams correlated");
                self.reload_all()?
            }
            CorrelationCommand::ClearJoin => self.reset_join()?,

            CorrelationCommand::ApplyFilters { stream, tree } => {
                self.apply_filters(&stream, tree)?
            }
            CorrelationCommand::SetTimeRange(range) => {
                self.time_range = range;
                self.reload_all()?
            }

            CorrelationCommand::SetFilter {
                stream,
                field,
                values,
            } => {
                self.window_mut(&stream)?.set_filter(&field, values);
                Vec::new()
            }
            CorrelationCommand::ClearFilter { stream, field } => {
                self.window_mut(&stream)?.clear_filter(&field);
                Vec::new()
            }
            CorrelationCommand::SetSort { stream, key, order } => {
                self.window_mut(&stream)?.set_sort(&key, order);
                Vec::new()
            }
            CorrelationCommand::ClearSort { stream } => {
                self.window_mut(&stream)?.clear_sort();
                Vec::new()
            }
            CorrelationCommand::SetPerPage { stream, per_page } => {
                self.window_mut(&stream)?.set_per_page(per_page);
                Vec::new()
            }
            CorrelationCommand::GotoPage { stream, page } => {
                self.window_mut(&stream)?.goto_page(page);
                Vec::new()
            }
            CorrelationCommand::AdvanceChunk { stream, direction } => {
                let request = self.window_mut(&stream)?.advance_chunk(direction);
                self.chunk_effects(&stream, request)?
            }
            CorrelationCommand::Retry { stream } => {
                let request = self.window_mut(&stream)?.retry();
                self.chunk_effects(&stream, request)?
            }
        };

        Ok(effects)
    }

    //-------------------------------------------------------------------------
    // Stream membership
    //-------------------------------------------------------------------------

    fn add_stream(
        &mut self,
        catalog: StreamFieldCatalog,
    ) -> Result<Vec<StreamEffect>, ValidationError> {
        if self.slot(catalog.stream_name()).is_some() {
            return Err(ValidationError::DuplicateStream {
                stream: catalog.stream_name().to_string(),
            });
        }
        if self.slots.len() >= MAX_STREAMS {
            return Err(ValidationError::TooManyStreams);
        }

        let stream = catalog.stream_name().to_string();
        info!(stream = %stream, "stream added to correlation");
        self.slots.push(StreamSlot {
            catalog,
            window: PageWindow::new(self.per_page, self.load_limit),
            tree: QueryTree::default(),
            selected: Vec::new(),
        });

        self.reload(&stream)
    }

    fn remove_stream(&mut self, stream: &str) -> Result<Vec<StreamEffect>, ValidationError> {
        let index = self
            .slots
            .iter()
            .position(|s| s.name() == stream)
            .ok_or_else(|| unknown_stream(stream))?;

        self.slots.remove(index);
        info!(stream = %stream, "stream removed from correlation");
        self.reset_join()
    }

    pub fn streams(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(StreamSlot::name)
    }

    pub fn catalog(&self, stream: &str) -> Option<&StreamFieldCatalog> {
        self.slot(stream).map(|s| &s.catalog)
    }

    pub fn window(&self, stream: &str) -> Option<&PageWindow> {
        self.slot(stream).map(|s| &s.window)
    }

    /// Rule tree last applied to `stream`.
    pub fn tree(&self, stream: &str) -> Option<&QueryTree> {
        self.slot(stream).map(|s| &s.tree)
    }

    //-------------------------------------------------------------------------
    // Field selection
    //-------------------------------------------------------------------------

    fn select_field(&mut self, stream: &str, field: &str) -> Result<(), ValidationError> {
        let slot = self.slot_mut(stream)?;
        if !slot.catalog.contains(field) {
            return Err(unknown_field(stream, field));
        }
        if !slot.selected.iter().any(|f| f == field) {
            slot.selected.push(field.to_string());
        }
        Ok(())
    }

    pub fn selected_fields(&self, stream: &str) -> &[String] {
        self.slot(stream).map(|s| s.selected.as_slice()).unwrap_or(&[])
    }

    //-------------------------------------------------------------------------
    // Join
    //-------------------------------------------------------------------------

    /// Only existence is checked here; whether the pair may be correlated is
    /// reported by [`Self::join_legality`].
    fn set_join_condition(
        &mut self,
        left_field: &str,
        right_field: &str,
    ) -> Result<Vec<StreamEffect>, ValidationError> {
        let (left, right) = self.pair()?;
        for (catalog, field) in [(&left.catalog, left_field), (&right.catalog, right_field)] {
            if !catalog.contains(field) {
                return Err(unknown_field(catalog.stream_name(), field));
            }
        }

        self.join = Some(JoinCondition {
            left_field: left_field.to_string(),
            right_field: right_field.to_string(),
        });

        if self.is_joined {
            debug!("join condition replaced, unjoining");
            self.is_joined = false;
            return self.reload_all();
        }
        Ok(Vec::new())
    }

    pub fn join_condition(&self) -> Option<&JoinCondition> {
        self.join.as_ref()
    }

    pub fn join_legality(&self) -> Result<(), ValidationError> {
        let (left, right) = self.pair()?;
        let join = self.join.as_ref().ok_or(ValidationError::NoJoinCondition)?;
        check_join(&left.catalog, &join.left_field, &right.catalog, &join.right_field)
    }

    pub fn is_join_legal(&self) -> bool {
        self.join_legality().is_ok()
    }

    pub fn is_joined(&self) -> bool {
        self.is_joined
    }

    /// Join equality, if a condition is declared and both streams are present.
    pub fn join_predicate(&self) -> Option<String> {
        let (left, right) = self.pair().ok()?;
        let join = self.join.as_ref()?;
        Some(join_predicate(
            left.name(),
            &join.left_field,
            right.name(),
            &join.right_field,
        ))
    }

    //-------------------------------------------------------------------------
    // Queries and fetches
    //-------------------------------------------------------------------------

    fn apply_filters(
        &mut self,
        stream: &str,
        tree: QueryTree,
    ) -> Result<Vec<StreamEffect>, ValidationError> {
        validate(&tree)?;
        let slot = self.slot_mut(stream)?;
        if let Some(rule) = tree
            .groups
            .iter()
            .flat_map(|g| &g.rules)
            .find(|r| !slot.catalog.contains(&r.field))
        {
            return Err(unknown_field(stream, &rule.field));
        }
        slot.tree = tree;
        info!(stream, joined = self.is_joined, "stream filters applied");

        if self.is_joined {
            self.reload_all()
        } else {
            self.reload(stream)
        }
    }

    pub fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    /// The fetch query for one stream at `offset`.
    ///
    /// While joined, both streams appear in `FROM` and the `WHERE` clause
    /// carries both time bounds, the join equality and both rule trees with
    /// relation-qualified fields. Only the stream's own columns are selected.
    /// Otherwise it is the plain single-stream query.
    pub fn stream_select(&self, stream: &str, offset: usize) -> Result<String, ValidationError> {
        let slot = self.slot(stream).ok_or_else(|| unknown_stream(stream))?;

        match self.joined_builder() {
            Some(builder) => Ok(builder
                .project_expr(format!("{}.*", quote_ident(stream)))
                .order_by_expr(format!("{} DESC", qualify_ident(stream, &self.time_column)))
                .with_limit(self.load_limit)
                .with_offset(offset)
                .build()),
            None => Ok(build_select(
                stream,
                &compile(&slot.tree, &slot.catalog),
                &self.time_range.sql_predicate(&self.time_column),
                &[] as &[String],
                &self.time_column,
                self.load_limit,
                offset,
            )),
        }
    }

    /// The count query for one stream. While joined this counts the joined
    /// rows, so both streams report the same total.
    pub fn stream_count(&self, stream: &str) -> Result<String, ValidationError> {
        let slot = self.slot(stream).ok_or_else(|| unknown_stream(stream))?;

        match self.joined_builder() {
            Some(builder) => Ok(builder.project_expr("COUNT(*) AS count").build()),
            None => Ok(build_count(
                stream,
                &compile(&slot.tree, &slot.catalog),
                &self.time_range.sql_predicate(&self.time_column),
            )),
        }
    }

    /// The combined query shown to the user: selected fields of both streams
    /// under their `stream.field` names, with the same filtering as the
    /// joined fetches.
    pub fn combined_query(&self) -> Result<String, ValidationError> {
        let (left, right) = self.pair()?;
        let predicate = self.join_predicate().ok_or(ValidationError::NoJoinCondition)?;

        let mut builder = self.join_builder(left, right, predicate);
        for slot in [left, right] {
            if slot.selected.is_empty() {
                builder = builder.project_expr(format!("{}.*", quote_ident(slot.name())));
            }
            for field in &slot.selected {
                builder = builder.project_expr(format!(
                    "{} AS {}",
                    qualify_ident(slot.name(), field),
                    quote_ident(&format!("{}.{field}", slot.name()))
                ));
            }
        }

        Ok(builder
            .order_by_expr(format!(
                "{} DESC",
                qualify_ident(left.name(), &self.time_column)
            ))
            .with_limit(self.load_limit)
            .build())
    }

    /// Hands a chunk response to the window it was issued for. Responses for
    /// a stream no longer present, or stale ones, are dropped.
    pub fn ingest_chunk(
        &mut self,
        stream: &str,
        request: ChunkRequest,
        result: Result<Vec<Row>, FetchError>,
    ) -> bool {
        match self.slot_mut(stream) {
            Ok(slot) => slot.window.ingest_chunk(request, result),
            Err(_) => {
                debug!(stream, "dropping response for removed stream");
                false
            }
        }
    }

    pub fn ingest_count(
        &mut self,
        stream: &str,
        request: CountRequest,
        result: Result<u64, FetchError>,
    ) -> bool {
        match self.slot_mut(stream) {
            Ok(slot) => slot.window.ingest_count(request, result),
            Err(_) => {
                debug!(stream, "dropping response for removed stream");
                false
            }
        }
    }

    //-------------------------------------------------------------------------
    // Display
    //-------------------------------------------------------------------------

    /// Current page of one stream keyed as `stream.field`.
    pub fn project(&self, stream: &str) -> Result<Vec<Row>, ValidationError> {
        let slot = self.slot(stream).ok_or_else(|| unknown_stream(stream))?;
        Ok(project(stream, slot.window.page_rows(), &slot.selected))
    }

    /// Joined rows for display: the two current page slices zipped by
    /// position.
    pub fn combine(&self) -> Result<Vec<Row>, ValidationError> {
        if !self.is_joined {
            return Err(ValidationError::NotJoined);
        }
        self.join_legality()?;

        let (left, right) = self.pair()?;
        Ok(zip_rows(self.project(left.name())?, self.project(right.name())?))
    }

    //-------------------------------------------------------------------------
    // Internals
    //-------------------------------------------------------------------------

    fn slot(&self, stream: &str) -> Option<&StreamSlot> {
        self.slots.iter().find(|s| s.name() == stream)
    }

    fn slot_mut(&mut self, stream: &str) -> Result<&mut StreamSlot, ValidationError> {
        self.slots
            .iter_mut()
            .find(|s| s.name() == stream)
            .ok_or_else(|| unknown_stream(stream))
    }

    fn window_mut(&mut self, stream: &str) -> Result<&mut PageWindow, ValidationError> {
        self.slot_mut(stream).map(|s| &mut s.window)
    }

    fn pair(&self) -> Result<(&StreamSlot, &StreamSlot), ValidationError> {
        match self.slots.as_slice() {
            [left, right] => Ok((left, right)),
            _ => Err(ValidationError::MissingStream),
        }
    }

    /// Shared `FROM` and `WHERE` of every query over the joined pair.
    fn join_builder(
        &self,
        left: &StreamSlot,
        right: &StreamSlot,
        predicate: String,
    ) -> SelectBuilder {
        let time_predicate = format!(
            "{} AND {}",
            self.time_range
                .qualified_sql_predicate(left.name(), &self.time_column),
            self.time_range
                .qualified_sql_predicate(right.name(), &self.time_column),
        );

        SelectBuilder::from_stream(left.name())
            .and_stream(right.name())
            .with_time_predicate(time_predicate)
            .with_condition(predicate)
            .with_condition(compile_qualified(&left.tree, &left.catalog, left.name()))
            .with_condition(compile_qualified(&right.tree, &right.catalog, right.name()))
    }

    fn joined_builder(&self) -> Option<SelectBuilder> {
        if !self.is_joined {
            return None;
        }
        let (left, right) = self.pair().ok()?;
        let predicate = self.join_predicate()?;
        Some(self.join_builder(left, right, predicate))
    }

    fn chunk_effect(
        &self,
        stream: &str,
        request: ChunkRequest,
    ) -> Result<StreamEffect, ValidationError> {
        Ok(StreamEffect {
            stream: stream.to_string(),
            effect: Effect::FetchChunk {
                sql: self.stream_select(stream, request.offset)?,
                request,
            },
        })
    }

    fn chunk_effects(
        &self,
        stream: &str,
        request: Option<ChunkRequest>,
    ) -> Result<Vec<StreamEffect>, ValidationError> {
        request
            .map(|request| self.chunk_effect(stream, request))
            .into_iter()
            .collect()
    }

    fn count_effect(
        &self,
        stream: &str,
        request: CountRequest,
    ) -> Result<StreamEffect, ValidationError> {
        Ok(StreamEffect {
            stream: stream.to_string(),
            effect: Effect::FetchCount {
                sql: self.stream_count(stream)?,
                request,
            },
        })
    }

    /// Starts a new generation for `stream`: first chunk plus count.
    fn reload(&mut self, stream: &str) -> Result<Vec<StreamEffect>, ValidationError> {
        let window = self.window_mut(stream)?;
        window.invalidate();
        let chunk = window.request_chunk();
        let count = window.request_count();
        Ok(vec![
            self.chunk_effect(stream, chunk)?,
            self.count_effect(stream, count)?,
        ])
    }

    fn reload_all(&mut self) -> Result<Vec<StreamEffect>, ValidationError> {
        let streams: Vec<String> = self.streams().map(str::to_string).collect();
        let mut effects = Vec::with_capacity(streams.len() * 2);
        for stream in &streams {
            effects.extend(self.reload(stream)?);
        }
        Ok(effects)
    }

    fn reset_join(&mut self) -> Result<Vec<StreamEffect>, ValidationError> {
        let was_joined = self.is_joined;
        self.join = None;
        self.is_joined = false;
        for slot in &mut self.slots {
            slot.selected.clear();
        }
        debug!(was_joined, "join cleared");

        if was_joined {
            self.reload_all()
        } else {
            Ok(Vec::new())
        }
    }
}

fn unknown_stream(stream: &str) -> ValidationError {
    ValidationError::UnknownStream {
        stream: stream.to_string(),
    }
}

fn unknown_field(stream: &str, field: &str) -> ValidationError {
    ValidationError::UnknownField {
        stream: stream.to_string(),
        field: field.to_string(),
    }
}
