use super::{
    Operator, QueryTree, Rule, RuleGroup, RuleValue, qualify_ident, quote_ident, quote_literal,
};
use crate::schema::{FieldType, StreamFieldCatalog};

/// Compiles `tree` into the body of a `WHERE` clause.
///
/// Incomplete rules are left out rather than rendered as `field = `, and a
/// group with nothing left to render is left out entirely, so the output
/// never contains an empty `()` group. Returns an empty string when nothing
/// survives. Sibling order is kept as written.
pub fn compile(tree: &QueryTree, catalog: &StreamFieldCatalog) -> String {
    compile_with(tree, catalog, &quote_ident)
}

/// Like [`compile`], with every field qualified by `relation`
/// (`"web"."host"`). Needed once more than one stream shares the `FROM`
/// list, where a bare column name may be ambiguous.
pub fn compile_qualified(tree: &QueryTree, catalog: &StreamFieldCatalog, relation: &str) -> String {
    compile_with(tree, catalog, &|field| qualify_ident(relation, field))
}

fn compile_with(
    tree: &QueryTree,
    catalog: &StreamFieldCatalog,
    ident: &dyn Fn(&str) -> String,
) -> String {
    let groups: Vec<(&RuleGroup, Vec<String>)> = tree
        .groups
        .iter()
        .map(|g| (g, compile_group(g, catalog, ident)))
        .filter(|(_, rules)| !rules.is_empty())
        .collect();

    let multiple_groups = groups.len() > 1;

    groups
        .into_iter()
        .map(|(group, rules)| {
            let joined = rules.join(&format!(" {} ", group.combinator.sql()));
            if multiple_groups && rules.len() > 1 {
                format!("({joined})")
            } else {
                joined
            }
        })
        .collect::<Vec<_>>()
        .join(&format!(" {} ", tree.combinator.sql()))
}

fn compile_group(
    group: &RuleGroup,
    catalog: &StreamFieldCatalog,
    ident: &dyn Fn(&str) -> String,
) -> Vec<String> {
    group
        .rules
        .iter()
        .filter_map(|rule| {
            let field_type = catalog.field_type(&rule.field).unwrap_or(FieldType::Text);
            compile_rule(rule, &ident(&rule.field), field_type)
        })
        .collect()
}

fn compile_rule(rule: &Rule, field: &str, field_type: FieldType) -> Option<String> {
    match rule.operator {
        Operator::IsNull => return Some(format!("{field} IS NULL")),
        Operator::IsNotNull => return Some(format!("{field} IS NOT NULL")),
        _ => {}
    }

    if !rule.is_complete() {
        return None;
    }

    let rendered = match (&rule.value, rule.operator) {
        (RuleValue::Text(s), Operator::Contains) => {
            format!("{field} LIKE {}", quote_literal(&format!("%{s}%")))
        }
        (RuleValue::Text(s), Operator::DoesNotContain) => {
            format!("{field} NOT LIKE {}", quote_literal(&format!("%{s}%")))
        }
        (RuleValue::Text(s), Operator::BeginsWith) => {
            format!("{field} LIKE {}", quote_literal(&format!("{s}%")))
        }
        (RuleValue::Text(s), Operator::EndsWith) => {
            format!("{field} LIKE {}", quote_literal(&format!("%{s}")))
        }
        (value, op) => format!("{field} {} {}", op.token(), literal(value, field_type)?),
    };

    Some(rendered)
}

fn literal(value: &RuleValue, field_type: FieldType) -> Option<String> {
    match value {
        RuleValue::NoValue => None,
        RuleValue::Number(n) => Some(n.to_string()),
        RuleValue::Text(s) => match field_type {
            FieldType::Boolean => Some(s.clone()),
            FieldType::Number if s.parse::<f64>().is_ok_and(f64::is_finite) => Some(s.clone()),
            _ => Some(quote_literal(s)),
        },
    }
}
