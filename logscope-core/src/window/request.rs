/// A chunk fetch issued by a window. The caller renders the SQL for
/// `[offset, offset + limit)` and hands the rows back with the request, so the
/// window can tell whether it still describes the same query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRequest {
    pub generation: u64,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRequest {
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Page to land on once the requested chunk arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingPage {
    First,
    Last,
    Exact(usize),
}
