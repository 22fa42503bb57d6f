use crate::rules::QueryTree;
use crate::schema::StreamFieldCatalog;
use crate::time::TimeRange;
use crate::window::{Direction, PerPage, SortOrder};

#[derive(Debug, Clone)]
pub enum CorrelationCommand {
    //-------------------------------------------------------------------------
    // Stream membership
    //-------------------------------------------------------------------------
    AddStream(StreamFieldCatalog),
    /// Drops the join and every field selection along with the stream.
    RemoveStream {
        stream: String,
    },

    //-------------------------------------------------------------------------
    // Field selection (local)
    //-------------------------------------------------------------------------
    SelectField {
        stream: String,
        field: String,
    },
    DeselectField {
        stream: String,
        field: String,
    },

    //-------------------------------------------------------------------------
    // Join
    //-------------------------------------------------------------------------
    /// Declares the condition; unjoins a joined pair.
    SetJoinCondition {
        left_field: String,
        right_field: String,
    },
    Correlate,
    ClearJoin,

    //-------------------------------------------------------------------------
    // Queries
    //-------------------------------------------------------------------------
    /// Replaces a stream's rule tree and refetches. While joined, both
    /// streams are refetched since each fetch carries both trees.
    ApplyFilters {
        stream: String,
        tree: QueryTree,
    },
    SetTimeRange(TimeRange),

    //-------------------------------------------------------------------------
    // Per-stream window (local unless noted)
    //-------------------------------------------------------------------------
    SetFilter {
        stream: String,
        field: String,
        values: Vec<String>,
    },
    ClearFilter {
        stream: String,
        field: String,
    },
    SetSort {
        stream: String,
        key: String,
        order: SortOrder,
    },
    ClearSort {
        stream: String,
    },
    SetPerPage {
        stream: String,
        per_page: PerPage,
    },
    GotoPage {
        stream: String,
        page: usize,
    },
    /// Fetches the neighbouring chunk of one stream.
    AdvanceChunk {
        stream: String,
        direction: Direction,
    },
    Retry {
        stream: String,
    },
}
