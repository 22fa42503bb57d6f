use crate::source::{Row, Scalar};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: String,
    pub order: SortOrder,
}

pub(crate) type Filters = BTreeMap<String, AHashSet<String>>;

fn cell<'a>(row: &'a Row, field: &str) -> &'a Scalar {
    static NULL: Scalar = Scalar::Null;
    row.get(field).unwrap_or(&NULL)
}

/// Indices into `chunk` of the rows passing every column filter, in sort
/// order. Without a sort the chunk order (time descending) is kept.
pub(crate) fn filtered_sorted(chunk: &[Row], filters: &Filters, sort: Option<&Sort>) -> Vec<usize> {
    let mut view: Vec<usize> = chunk
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            filters
                .iter()
                .all(|(field, allowed)| allowed.contains(&cell(row, field).to_filter_string()))
        })
        .map(|(i, _)| i)
        .collect();

    if let Some(sort) = sort {
        view.sort_by(|&a, &b| {
            let ord = cell(&chunk[a], &sort.key).sort_cmp(cell(&chunk[b], &sort.key));
            match sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    view
}
