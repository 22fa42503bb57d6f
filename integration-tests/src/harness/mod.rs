pub mod source;
pub mod tracing;

pub use source::{MemorySource, SourceCall, fixed_clock, now, rows};
pub use tracing::{CapturedEvent, TracingCapture, capture_tracing};
