//! Single-stream explorer state.
//!
//! [`ExplorerState`] is a plain value. [`apply`] takes a state and a
//! [`Command`] and returns the next state plus the [`Effect`]s (fetches) the
//! caller has to run; it never performs I/O itself. [`Driver`] is the async
//! shell that runs effects against a [`LogSource`](crate::source::LogSource)
//! and feeds the responses back.

mod command;
mod driver;
mod effect;
mod mode;
mod state;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use driver::Driver;
pub use effect::{Effect, Transition};
pub use mode::{FilterMode, RowRange, ViewMode};
pub use state::{AppliedQuery, ExplorerState, apply};
