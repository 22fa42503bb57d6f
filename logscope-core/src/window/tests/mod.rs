
use crate::source::{Row, Scalar};
use crate::window::{PageWindow, PerPage};

pub(super) fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let mut row = Row::new();
            row.insert("seq".into(), Scalar::Int(i as i64));
            row.insert(
                "status".into(),
                Scalar::Int(if i % 4 == 0 { 500 } else { 200 }),
            );
            row.insert("host".into(), Scalar::Text(format!("h{}", i % 3)));
            row
        })
        .collect()
}

pub(super) fn per_page(n: usize) -> PerPage {
    PerPage::new(n).unwrap()
}

/// A window holding `n` rows at offset 0, 50 rows per page.
pub(super) fn loaded(n: usize) -> PageWindow {
    let mut window = PageWindow::new(PerPage::default(), 1000);
    let request = window.request_chunk();
    assert!(window.ingest_chunk(request, Ok(rows(n))));
    window
}
