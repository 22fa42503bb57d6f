//! Two-stream correlation.
//!
//! Each participating stream keeps its own [`PageWindow`](crate::window::PageWindow)
//! and rule tree, fetched independently. [`apply`] works like the explorer's:
//! a [`CorrelationCommand`] against a state value yields the next state plus
//! the [`StreamEffect`]s to run, and [`CorrelationDriver`] runs them.
//!
//! Once the streams are joined, every fetch lists both relations and carries
//! both time bounds, the join equality and both rule trees with qualified
//! fields (`FROM "a", "b" WHERE ... AND "a"."x" = "b"."y"`). The two current
//! page slices are zipped positionally for display. Rows are never matched on
//! the join key client-side: the zip relies on the backend having aligned
//! both result sets through the shared predicate.

mod combine;
mod command;
mod driver;
mod effect;
mod join;
mod state;

#[cfg(test)]
mod tests;

pub use combine::{project, zip_rows};
pub use command::CorrelationCommand;
pub use driver::CorrelationDriver;
pub use effect::{CorrelationTransition, StreamEffect};
pub use join::{JoinCondition, check_join, join_predicate};
pub use state::{CorrelationState, MAX_STREAMS, apply};
