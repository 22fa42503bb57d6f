use crate::error::ValidationError;
use crate::rules::{
    Combinator, CombinatorTarget, Operator, QueryTree, RulePatch, add_rule, create_group,
    set_combinator, update_rule,
};
use crate::schema::StreamFieldCatalog;
use serde::Deserialize;

/// A rule tree written by hand:
///
/// ```json
/// { "combinator": "and",
///   "groups": [
///     { "combinator": "or",
///       "rules": [ { "field": "status", "operator": "=", "value": "500" },
///                  { "field": "host", "operator": "is null" } ] } ] }
/// ```
///
/// Values are given as typed by a user and go through the same coercion as
/// the rule editor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesFile {
    #[serde(default)]
    pub combinator: Combinator,
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupEntry {
    #[serde(default = "group_combinator")]
    pub combinator: Combinator,
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Option<String>,
}

fn group_combinator() -> Combinator {
    Combinator::Or
}

impl RulesFile {
    pub fn from_json(src: &str) -> serde_json::Result<Self> {
        serde_json::from_str(src)
    }

    /// Replays the file as editor operations against `catalog`. Groups
    /// without rules are skipped.
    pub fn build(&self, catalog: &StreamFieldCatalog) -> Result<QueryTree, ValidationError> {
        let mut tree = set_combinator(&QueryTree::default(), CombinatorTarget::Root, self.combinator)?;

        for entry in self.groups.iter().filter(|g| !g.rules.is_empty()) {
            tree = create_group(&tree, catalog);
            let Some(group) = tree.groups.last().map(|g| g.id) else {
                // catalog has no fields
                break;
            };

            for (i, rule) in entry.rules.iter().enumerate() {
                if i > 0 {
                    tree = add_rule(&tree, catalog, group)?;
                }
                let rule_id = tree
                    .group(group)
                    .and_then(|g| g.rules.last())
                    .map(|r| r.id)
                    .ok_or_else(|| ValidationError::UnknownGroup {
                        group: group.to_string(),
                    })?;

                let patch = RulePatch {
                    field: Some(rule.field.clone()),
                    operator: Some(rule.operator),
                    value: rule.value.clone(),
                };
                tree = update_rule(&tree, catalog, group, rule_id, patch)?;
            }

            tree = set_combinator(&tree, CombinatorTarget::Group(group), entry.combinator)?;
        }

        Ok(tree)
    }
}
