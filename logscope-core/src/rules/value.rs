use super::Operator;
use crate::error::ValidationError;
use crate::schema::FieldType;
use serde::{Deserialize, Serialize};

/// Comparison value of a rule, typed when the rule is edited.
///
/// `Text("")` is the "not entered yet" state for every field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    NoValue,
    Number(f64),
    Text(String),
}

impl Default for RuleValue {
    fn default() -> Self {
        RuleValue::empty()
    }
}

impl RuleValue {
    pub fn empty() -> Self {
        RuleValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RuleValue::NoValue => true,
            RuleValue::Number(_) => false,
            RuleValue::Text(s) => s.is_empty(),
        }
    }

    /// Types raw user input for `field` under `operator`.
    pub fn typed(
        field: &str,
        field_type: FieldType,
        operator: Operator,
        raw: &str,
    ) -> Result<RuleValue, ValidationError> {
        if operator.is_no_value() {
            return Ok(RuleValue::NoValue);
        }

        if raw.trim().is_empty() {
            return Ok(RuleValue::empty());
        }

        match field_type {
            FieldType::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(RuleValue::Number)
                .ok_or_else(|| ValidationError::NotANumber {
                    field: field.to_string(),
                    value: raw.to_string(),
                }),
            FieldType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                b @ ("true" | "false") => Ok(RuleValue::Text(b.to_string())),
                _ => Err(ValidationError::NotABoolean {
                    field: field.to_string(),
                    value: raw.to_string(),
                }),
            },
            FieldType::Text | FieldType::Timestamp | FieldType::List => {
                Ok(RuleValue::Text(raw.to_string()))
            }
        }
    }
}
