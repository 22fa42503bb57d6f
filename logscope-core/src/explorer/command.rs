use super::{AppliedQuery, FilterMode, RowRange, ViewMode};
use crate::rules::{Combinator, CombinatorTarget, GroupId, RuleId, RulePatch};
use crate::time::{Preset, TimeRange};
use crate::window::{Direction, PerPage, SortOrder};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    //-------------------------------------------------------------------------
    // Rule tree editing (no fetch until applied)
    //-------------------------------------------------------------------------
    AddGroup,
    AddRule {
        group: GroupId,
    },
    DeleteRule {
        group: GroupId,
        rule: RuleId,
    },
    UpdateRule {
        group: GroupId,
        rule: RuleId,
        patch: RulePatch,
    },
    SetCombinator {
        target: CombinatorTarget,
        combinator: Combinator,
    },
    /// Compiles the tree and refetches.
    ApplyFilters,

    //-------------------------------------------------------------------------
    // Raw SQL
    //-------------------------------------------------------------------------
    SetRawSql(String),
    ApplyRawSql,
    SetFilterMode(FilterMode),
    /// Puts back query text taken from a deep link and refetches. The rule
    /// tree is left as is.
    RestoreQuery(AppliedQuery),

    //-------------------------------------------------------------------------
    // Time range
    //-------------------------------------------------------------------------
    SetTimeRange(TimeRange),
    /// Resolves the preset against the state's clock.
    SelectPreset(Preset),
    /// Re-resolves a relative range and reloads from the first chunk.
    Refresh,

    //-------------------------------------------------------------------------
    // Window (local unless noted)
    //-------------------------------------------------------------------------
    SetFilter {
        field: String,
        values: Vec<String>,
    },
    ClearFilter {
        field: String,
    },
    SetSort {
        key: String,
        order: SortOrder,
    },
    ClearSort,
    SetPerPage(PerPage),
    GotoPage(usize),
    /// Fetches the neighbouring chunk.
    AdvanceChunk(Direction),
    /// Moves to an absolute page across chunks; fetches when it falls outside
    /// the loaded chunk.
    RestorePage(usize),
    Retry,

    //-------------------------------------------------------------------------
    // Presentation
    //-------------------------------------------------------------------------
    SetView(ViewMode),
    SetVisibleFields(Vec<String>),
    SetRowRange(Option<RowRange>),
}

impl Command {
    /// Commands that never lead to a fetch.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            Command::ApplyFilters
                | Command::ApplyRawSql
                | Command::RestoreQuery(_)
                | Command::SetTimeRange(_)
                | Command::SelectPreset(_)
                | Command::Refresh
                | Command::AdvanceChunk(_)
                | Command::RestorePage(_)
                | Command::Retry
        )
    }
}
