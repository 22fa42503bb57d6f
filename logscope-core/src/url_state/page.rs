use crate::window::PerPage;

/// Largest page a URL may ask for: the first row of every page up to it is
/// addressable at the largest page size.
pub const MAX_PAGE: usize = usize::MAX / PerPage::ALLOWED[PerPage::ALLOWED.len() - 1];

/// Where an absolute page lives in the chunked window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePosition {
    /// Offset of the chunk holding the page, a multiple of `load_limit`.
    pub offset: usize,
    /// 1-based page within that chunk.
    pub page_in_chunk: usize,
}

/// Absolute page number written to the URL:
/// `page_in_chunk + ceil(chunk_offset / per_page)`.
pub fn absolute_page(page_in_chunk: usize, chunk_offset: usize, per_page: usize) -> usize {
    page_in_chunk + chunk_offset.div_ceil(per_page.max(1))
}

/// Inverse of [`absolute_page`]. The chunk offset is derived first,
/// `floor((page - 1) * per_page / load_limit) * load_limit`, and the page
/// within the chunk from it. Page 0 reads as page 1.
///
/// `None` when the first row of `page` lies beyond `usize::MAX`.
pub fn restore_position(page: usize, per_page: usize, load_limit: usize) -> Option<PagePosition> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let load_limit = load_limit.max(1);

    let first_row = (page - 1).checked_mul(per_page)?;
    let offset = first_row / load_limit * load_limit;
    Some(PagePosition {
        offset,
        page_in_chunk: page - offset.div_ceil(per_page),
    })
}
