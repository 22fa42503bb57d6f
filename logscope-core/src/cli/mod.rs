//! Operator commands. The `logscope` binary parses arguments and hands them
//! to the functions here; everything printed goes to stdout.

pub mod buckets;
pub mod compile;
pub mod conf;
mod highlight;
mod rules_file;
mod schema_file;
pub mod url;

#[cfg(test)]
mod tests;

pub use highlight::highlight_sql;
pub use rules_file::{GroupEntry, RuleEntry, RulesFile};
pub use schema_file::{SchemaField, SchemaFile};
