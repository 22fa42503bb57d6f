//! Explorer state to URL parameters and back.
//!
//! Only whitelisted keys are read or written. Each direction has exactly one
//! entry point on [`UrlSync`]: `store_to_url` writes nothing when the URL
//! already describes the state, and `url_to_store` only issues commands for
//! values that differ from the state, so applying a URL twice is a fixed
//! point and the two directions cannot feed each other.

mod date_format;
mod error;
mod page;
mod params;
mod sync;

#[cfg(test)]
mod tests;

pub use date_format::{URL_DATE_FORMAT, format_url_date, parse_url_date};
pub use error::UrlParamError;
pub use page::{MAX_PAGE, PagePosition, absolute_page, restore_position};
pub use params::{KEYS, UrlParams};
pub use sync::UrlSync;
