//! Rule tree model and SQL compiler.
//!
//! A [`QueryTree`] is two levels deep: groups of rules, groups combined by a
//! root combinator. Every edit is a pure function returning a new tree, and
//! the compiler is a pure function of a tree plus the stream's field types.

mod compile;
mod edit;
mod operator;
mod select;
mod sql;
mod types;
mod value;

#[cfg(test)]
mod tests;

pub use compile::{compile, compile_qualified};
pub use edit::{
    CombinatorTarget, RulePatch, add_rule, create_group, delete_rule, is_submittable,
    set_combinator, update_rule, validate,
};
pub use operator::Operator;
pub use select::{
    SelectBuilder, build_aggregate, build_count, build_select, wrap_raw_count, wrap_raw_select,
};
pub use sql::{qualify_ident, quote_ident, quote_literal};
pub use types::{Combinator, GroupId, QueryTree, Rule, RuleGroup, RuleId};
pub use value::RuleValue;
