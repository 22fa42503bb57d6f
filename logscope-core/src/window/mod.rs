//! Windowed pagination cache.
//!
//! The remote store is read in chunks of at most `load_limit` rows. Pages are
//! derived from the chunk in memory: filtering, sorting and page-size changes
//! never go back to the network. Only [`PageWindow::request_chunk`] (and the
//! operations that return a [`ChunkRequest`]) lead to I/O, which the caller
//! performs and feeds back through [`PageWindow::ingest_chunk`].
//!
//! ```text
//! request_chunk ──► ChunkRequest ──► LogSource ──► ingest_chunk
//!                       │                              │
//!                       └──── generation check ◄───────┘
//! ```

mod page_window;
mod per_page;
mod request;
mod view;

#[cfg(test)]
mod tests;

pub use page_window::{PageWindow, WindowStatus};
pub use per_page::PerPage;
pub use request::{ChunkRequest, CountRequest, Direction, PendingPage};
pub use view::{Sort, SortOrder};

/// Default number of rows fetched per chunk.
pub const LOAD_LIMIT: usize = 1000;
