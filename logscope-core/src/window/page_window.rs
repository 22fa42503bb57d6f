use super::view::{Filters, filtered_sorted};
use super::{ChunkRequest, CountRequest, Direction, PendingPage, PerPage, Sort, SortOrder};
use crate::error::FetchError;
use crate::source::Row;
use ahash::AHashSet;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WindowStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(FetchError),
}

/// One stream's chunk plus the pagination, filter and sort state over it.
///
/// Invariants after every operation:
/// - `total_pages == ceil(|filtered chunk| / per_page)`
/// - `current_page` is in `[1, total_pages]`, or `0` when nothing is
///   displayable (no chunk loaded, or every row filtered out)
#[derive(Debug, Clone)]
pub struct PageWindow {
    chunk: Vec<Row>,
    view: Vec<usize>,
    chunk_offset: usize,
    load_limit: usize,
    per_page: PerPage,
    current_page: usize,
    total_count: Option<u64>,
    filters: Filters,
    sort: Option<Sort>,
    status: WindowStatus,
    generation: u64,
    pending: PendingPage,
    last_request: Option<ChunkRequest>,
}

impl PageWindow {
    pub fn new(per_page: PerPage, load_limit: usize) -> Self {
        Self {
            chunk: Vec::new(),
            view: Vec::new(),
            chunk_offset: 0,
            load_limit: load_limit.max(1),
            per_page,
            current_page: 0,
            total_count: None,
            filters: Filters::new(),
            sort: None,
            status: WindowStatus::Idle,
            generation: 0,
            pending: PendingPage::First,
            last_request: None,
        }
    }

    //-------------------------------------------------------------------------
    // Network-facing operations
    //-------------------------------------------------------------------------

    /// Issues a fetch for the chunk at the current offset.
    pub fn request_chunk(&mut self) -> ChunkRequest {
        let request = ChunkRequest {
            generation: self.generation,
            offset: self.chunk_offset,
            limit: self.load_limit,
        };
        self.status = WindowStatus::Loading;
        self.last_request = Some(request);
        info!(
            generation = request.generation,
            offset = request.offset,
            limit = request.limit,
            "chunk requested"
        );
        request
    }

    /// Stores the outcome of `request`. Returns `false` when the response is
    /// stale (issued for an earlier query, time range or offset) and was
    /// dropped.
    pub fn ingest_chunk(
        &mut self,
        request: ChunkRequest,
        result: Result<Vec<Row>, FetchError>,
    ) -> bool {
        if self.is_stale(&request) {
            debug!(
                request_generation = request.generation,
                window_generation = self.generation,
                request_offset = request.offset,
                window_offset = self.chunk_offset,
                "dropping stale chunk response"
            );
            return false;
        }

        match result {
            Ok(mut rows) => {
                rows.truncate(self.load_limit);
                info!(offset = request.offset, rows = rows.len(), "chunk loaded");
                self.chunk = rows;
                self.status = WindowStatus::Ready;
                self.recompute_view();
                self.current_page = match self.pending {
                    PendingPage::First => 1,
                    PendingPage::Last => self.total_pages(),
                    PendingPage::Exact(n) => n,
                };
                self.pending = PendingPage::First;
                self.clamp_page();
            }
            Err(err) => {
                warn!(offset = request.offset, error = %err, "chunk fetch failed");
                self.status = WindowStatus::Failed(err);
            }
        }

        true
    }

    pub fn request_count(&self) -> CountRequest {
        CountRequest {
            generation: self.generation,
        }
    }

    pub fn ingest_count(&mut self, request: CountRequest, result: Result<u64, FetchError>) -> bool {
        if request.generation != self.generation {
            debug!(
                request_generation = request.generation,
                window_generation = self.generation,
                "dropping stale count response"
            );
            return false;
        }

        match result {
            Ok(count) => self.total_count = Some(count),
            Err(err) => warn!(error = %err, "count fetch failed"),
        }
        true
    }

    /// Re-issues the last failed request unchanged.
    pub fn retry(&mut self) -> Option<ChunkRequest> {
        if !matches!(self.status, WindowStatus::Failed(_)) {
            return None;
        }

        let request = self.last_request.filter(|r| !self.is_stale(r))?;
        self.status = WindowStatus::Loading;
        Some(request)
    }

    /// Moves to the neighbouring chunk.
    ///
    /// `Prev` from offset 0 is a no-op. `Prev` landing on offset 0 passes
    /// through the synthetic page-0 state (chunk dropped, `current_page == 0`)
    /// so the first chunk is always fetched again rather than being mistaken
    /// for the chunk already shown.
    pub fn advance_chunk(&mut self, direction: Direction) -> Option<ChunkRequest> {
        match direction {
            Direction::Next => {
                self.chunk_offset += self.load_limit;
                self.pending = PendingPage::First;
            }
            Direction::Prev => {
                if self.chunk_offset == 0 {
                    return None;
                }
                self.chunk_offset = self.chunk_offset.saturating_sub(self.load_limit);
                self.pending = PendingPage::Last;

                if self.chunk_offset == 0 {
                    debug!("returning to first chunk through page 0");
                    self.chunk.clear();
                    self.view.clear();
                    self.current_page = 0;
                }
            }
        }

        Some(self.request_chunk())
    }

    /// Positions the window at an absolute chunk offset and page, as restored
    /// from a deep link. The offset is aligned down to a chunk boundary.
    pub fn jump_to(&mut self, offset: usize, page: usize) -> ChunkRequest {
        self.chunk_offset = offset - offset % self.load_limit;
        self.pending = PendingPage::Exact(page.max(1));
        self.chunk.clear();
        self.view.clear();
        self.current_page = 0;
        self.request_chunk()
    }

    /// Drops everything tied to the current query: chunk, offset, filters,
    /// sort, total count. Responses to earlier requests become stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.chunk.clear();
        self.view.clear();
        self.chunk_offset = 0;
        self.current_page = 0;
        self.total_count = None;
        self.filters.clear();
        self.sort = None;
        self.status = WindowStatus::Idle;
        self.pending = PendingPage::First;
        self.last_request = None;
        debug!(generation = self.generation, "window invalidated");
    }

    //-------------------------------------------------------------------------
    // Local operations (no network)
    //-------------------------------------------------------------------------

    /// Restricts `field` to `allowed` values. An empty set removes the filter.
    pub fn set_filter<I, S>(&mut self, field: &str, allowed: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: AHashSet<String> = allowed.into_iter().map(Into::into).collect();
        if allowed.is_empty() {
            self.filters.remove(field);
        } else {
            self.filters.insert(field.to_string(), allowed);
        }
        self.reset_view();
    }

    pub fn clear_filter(&mut self, field: &str) {
        self.filters.remove(field);
        self.reset_view();
    }

    pub fn set_sort(&mut self, key: &str, order: SortOrder) {
        self.sort = Some(Sort {
            key: key.to_string(),
            order,
        });
        self.reset_view();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.reset_view();
    }

    pub fn set_per_page(&mut self, per_page: PerPage) {
        self.per_page = per_page;
        self.reset_view();
    }

    /// Clamped to `[1, total_pages]`; a no-op while nothing is displayable.
    pub fn goto_page(&mut self, page: usize) {
        let total = self.total_pages();
        if total == 0 {
            return;
        }
        self.current_page = page.clamp(1, total);
    }

    /// Lands on `page` of the chunk being loaded, or goes there directly
    /// when nothing is outstanding.
    pub fn land_on(&mut self, page: usize) {
        if self.is_loading() {
            self.pending = PendingPage::Exact(page.max(1));
        } else {
            self.goto_page(page);
        }
    }

    //-------------------------------------------------------------------------
    // Derived state
    //-------------------------------------------------------------------------

    /// The page the window shows, or will show once the outstanding chunk
    /// arrives.
    pub fn target_page(&self) -> usize {
        if !self.is_loading() {
            return self.current_page;
        }
        match self.pending {
            PendingPage::First => 1,
            PendingPage::Exact(n) => n,
            PendingPage::Last => self.current_page,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.view.len().div_ceil(self.per_page.get())
    }

    /// Rows of the current page, after filters and sort.
    pub fn page_rows(&self) -> Vec<&Row> {
        if self.current_page == 0 {
            return Vec::new();
        }
        let per_page = self.per_page.get();
        let start = (self.current_page - 1) * per_page;
        self.view
            .iter()
            .skip(start)
            .take(per_page)
            .map(|&i| &self.chunk[i])
            .collect()
    }

    pub fn display_count(&self) -> usize {
        self.page_rows().len().min(self.per_page.get())
    }

    /// Distinct values of `field` in the current chunk, for filter pickers.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        self.chunk
            .iter()
            .map(|row| {
                row.get(field)
                    .map(|v| v.to_filter_string())
                    .unwrap_or_else(|| "null".to_string())
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn chunk(&self) -> &[Row] {
        &self.chunk
    }

    pub fn chunk_offset(&self) -> usize {
        self.chunk_offset
    }

    pub fn load_limit(&self) -> usize {
        self.load_limit
    }

    pub fn per_page(&self) -> PerPage {
        self.per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn filter_fields(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    pub fn status(&self) -> &WindowStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_request(&self) -> Option<ChunkRequest> {
        self.last_request
    }

    pub fn is_loading(&self) -> bool {
        self.status == WindowStatus::Loading
    }

    //-------------------------------------------------------------------------
    // Internals
    //-------------------------------------------------------------------------

    fn is_stale(&self, request: &ChunkRequest) -> bool {
        request.generation != self.generation || request.offset != self.chunk_offset
    }

    fn recompute_view(&mut self) {
        self.view = filtered_sorted(&self.chunk, &self.filters, self.sort.as_ref());
    }

    fn reset_view(&mut self) {
        self.recompute_view();
        self.current_page = 1;
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let total = self.total_pages();
        self.current_page = if total == 0 {
            0
        } else {
            self.current_page.clamp(1, total)
        };
    }
}
