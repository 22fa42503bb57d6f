use super::{Combinator, GroupId, Operator, QueryTree, Rule, RuleGroup, RuleId, RuleValue};
use crate::error::ValidationError;
use crate::schema::{FieldType, StreamFieldCatalog};
use tracing::trace;

/// Partial update of a rule. Fields are applied in order: field, operator,
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulePatch {
    pub field: Option<String>,
    pub operator: Option<Operator>,
    pub value: Option<String>,
}

impl RulePatch {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::default()
        }
    }

    pub fn operator(operator: Operator) -> Self {
        Self {
            operator: Some(operator),
            ..Self::default()
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorTarget {
    Root,
    Group(GroupId),
}

fn default_rule(catalog: &StreamFieldCatalog) -> Option<Rule> {
    let (field, _) = catalog.first_field()?;
    Some(Rule {
        id: RuleId::new(),
        field: field.to_string(),
        operator: Operator::Equal,
        value: RuleValue::empty(),
    })
}

/// Appends a group holding one default rule, combined with `Or`.
///
/// Returns the tree unchanged when the catalog has no fields.
pub fn create_group(tree: &QueryTree, catalog: &StreamFieldCatalog) -> QueryTree {
    let Some(rule) = default_rule(catalog) else {
        return tree.clone();
    };

    let mut next = tree.clone();
    next.groups.push(RuleGroup {
        id: GroupId::new(),
        combinator: Combinator::Or,
        rules: vec![rule],
    });
    next
}

pub fn add_rule(
    tree: &QueryTree,
    catalog: &StreamFieldCatalog,
    group_id: GroupId,
) -> Result<QueryTree, ValidationError> {
    let mut next = tree.clone();
    let group = group_mut(&mut next, group_id)?;

    if let Some(rule) = default_rule(catalog) {
        group.rules.push(rule);
    }

    Ok(next)
}

/// Removes a rule. A group whose last rule is deleted is removed with it.
pub fn delete_rule(
    tree: &QueryTree,
    group_id: GroupId,
    rule_id: RuleId,
) -> Result<QueryTree, ValidationError> {
    let mut next = tree.clone();
    let group = group_mut(&mut next, group_id)?;

    let before = group.rules.len();
    group.rules.retain(|r| r.id != rule_id);
    if group.rules.len() == before {
        return Err(unknown_rule(rule_id));
    }

    if group.rules.is_empty() {
        trace!(group = %group_id, "last rule deleted, removing group");
        next.groups.retain(|g| g.id != group_id);
    }

    Ok(next)
}

/// Applies `patch` to a rule.
///
/// Changing the field resets the operator to `=` and the value to empty,
/// since operator legality depends on the field type.
pub fn update_rule(
    tree: &QueryTree,
    catalog: &StreamFieldCatalog,
    group_id: GroupId,
    rule_id: RuleId,
    patch: RulePatch,
) -> Result<QueryTree, ValidationError> {
    let mut next = tree.clone();
    let group = group_mut(&mut next, group_id)?;
    let rule = group
        .rules
        .iter_mut()
        .find(|r| r.id == rule_id)
        .ok_or_else(|| unknown_rule(rule_id))?;

    if let Some(field) = patch.field {
        if !catalog.contains(&field) {
            return Err(ValidationError::UnknownField {
                stream: catalog.stream_name().to_string(),
                field,
            });
        }
        if field != rule.field {
            rule.field = field;
            rule.operator = Operator::Equal;
            rule.value = RuleValue::empty();
        }
    }

    let field_type = catalog.field_type(&rule.field).unwrap_or(FieldType::Text);

    if let Some(operator) = patch.operator {
        if !operator.is_legal_for(field_type) {
            return Err(ValidationError::IllegalOperator {
                field: rule.field.clone(),
                operator: operator.token().to_string(),
            });
        }

        let was_no_value = rule.operator.is_no_value();
        rule.operator = operator;

        if operator.is_no_value() {
            rule.value = RuleValue::NoValue;
        } else if was_no_value {
            rule.value = RuleValue::empty();
        }
    }

    if let Some(raw) = patch.value {
        rule.value = RuleValue::typed(&rule.field, field_type, rule.operator, &raw)?;
    }

    Ok(next)
}

pub fn set_combinator(
    tree: &QueryTree,
    target: CombinatorTarget,
    combinator: Combinator,
) -> Result<QueryTree, ValidationError> {
    let mut next = tree.clone();
    match target {
        CombinatorTarget::Root => next.combinator = combinator,
        CombinatorTarget::Group(id) => group_mut(&mut next, id)?.combinator = combinator,
    }
    Ok(next)
}

/// Fails with the first rule that still needs a value.
pub fn validate(tree: &QueryTree) -> Result<(), ValidationError> {
    match tree
        .groups
        .iter()
        .flat_map(|g| g.rules.iter())
        .find(|r| !r.is_complete())
    {
        Some(rule) => Err(ValidationError::EmptyRuleValue {
            field: rule.field.clone(),
        }),
        None => Ok(()),
    }
}

/// Whether the tree may be submitted. Recomputed from the tree on every
/// call; callers gate their submit action on this instead of inspecting
/// rules themselves.
pub fn is_submittable(tree: &QueryTree) -> bool {
    validate(tree).is_ok()
}

fn group_mut(tree: &mut QueryTree, id: GroupId) -> Result<&mut RuleGroup, ValidationError> {
    tree.groups
        .iter_mut()
        .find(|g| g.id == id)
        .ok_or_else(|| ValidationError::UnknownGroup {
            group: id.to_string(),
        })
}

fn unknown_rule(id: RuleId) -> ValidationError {
    ValidationError::UnknownRule {
        rule: id.to_string(),
    }
}
