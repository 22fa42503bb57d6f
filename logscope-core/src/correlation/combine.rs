use crate::source::Row;

/// Re-keys `rows` as `"<stream>.<field>"`, keeping only `fields` when any
/// are given. Fields a row lacks are left out, so records stay sparse.
pub fn project<'a, I>(stream: &str, rows: I, fields: &[String]) -> Vec<Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    rows.into_iter()
        .map(|row| {
            if fields.is_empty() {
                row.iter()
                    .map(|(field, value)| (format!("{stream}.{field}"), value.clone()))
                    .collect()
            } else {
                fields
                    .iter()
                    .filter_map(|field| {
                        row.get(field)
                            .map(|value| (format!("{stream}.{field}"), value.clone()))
                    })
                    .collect()
            }
        })
        .collect()
}

/// Positional merge: row `i` of the result holds row `i` of both sides. The
/// result is as long as the longer side; a side that has run out contributes
/// nothing.
pub fn zip_rows(left: Vec<Row>, right: Vec<Row>) -> Vec<Row> {
    let len = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();

    (0..len)
        .map(|_| {
            let mut merged = left.next().unwrap_or_default();
            merged.extend(right.next().unwrap_or_default());
            merged
        })
        .collect()
}
