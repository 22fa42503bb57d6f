use crate::schema::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "does not contain")]
    DoesNotContain,
    #[serde(rename = "begins with")]
    BeginsWith,
    #[serde(rename = "ends with")]
    EndsWith,
    #[serde(rename = "is null")]
    IsNull,
    #[serde(rename = "is not null")]
    IsNotNull,
}

const NUMERIC: &[Operator] = &[
    Operator::Equal,
    Operator::NotEqual,
    Operator::Less,
    Operator::Greater,
    Operator::LessOrEqual,
    Operator::GreaterOrEqual,
    Operator::IsNull,
    Operator::IsNotNull,
];

const TEXT: &[Operator] = &[
    Operator::Equal,
    Operator::NotEqual,
    Operator::Contains,
    Operator::DoesNotContain,
    Operator::BeginsWith,
    Operator::EndsWith,
    Operator::IsNull,
    Operator::IsNotNull,
];

const BOOLEAN: &[Operator] = &[
    Operator::Equal,
    Operator::NotEqual,
    Operator::IsNull,
    Operator::IsNotNull,
];

const LIST: &[Operator] = &[Operator::IsNull, Operator::IsNotNull];

impl Operator {
    /// `is null` / `is not null` take no comparison value.
    pub fn is_no_value(&self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    pub fn legal_for(field_type: FieldType) -> &'static [Operator] {
        match field_type {
            FieldType::Number | FieldType::Timestamp => NUMERIC,
            FieldType::Text => TEXT,
            FieldType::Boolean => BOOLEAN,
            FieldType::List => LIST,
        }
    }

    pub fn is_legal_for(&self, field_type: FieldType) -> bool {
        Self::legal_for(field_type).contains(self)
    }

    pub fn from_token(token: &str) -> Option<Operator> {
        ALL.iter().copied().find(|op| op.token() == token)
    }

    /// Token as shown to the user and accepted in rule files.
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "does not contain",
            Operator::BeginsWith => "begins with",
            Operator::EndsWith => "ends with",
            Operator::IsNull => "is null",
            Operator::IsNotNull => "is not null",
        }
    }
}

const ALL: &[Operator] = &[
    Operator::Equal,
    Operator::NotEqual,
    Operator::Less,
    Operator::Greater,
    Operator::LessOrEqual,
    Operator::GreaterOrEqual,
    Operator::Contains,
    Operator::DoesNotContain,
    Operator::BeginsWith,
    Operator::EndsWith,
    Operator::IsNull,
    Operator::IsNotNull,
];

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
