use serde::{Deserialize, Serialize};
use std::fmt;

/// Field type as far as filtering and joining are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Timestamp,
    Boolean,
    List,
}

impl FieldType {
    /// Maps a declared (Arrow-style) type name onto a [`FieldType`].
    ///
    /// Anything unrecognised is treated as text, which only ever makes a
    /// literal quoted.
    pub fn from_declared(declared: &str) -> FieldType {
        let declared = declared.trim();
        let head = declared
            .split(|c: char| c == '(' || c == '<')
            .next()
            .unwrap_or(declared)
            .trim()
            .to_ascii_lowercase();

        match head.as_str() {
            "int8" | "int16" | "int32" | "int64" | "uint8" | "uint16" | "uint32" | "uint64"
            | "float16" | "float32" | "float64" | "decimal128" | "decimal256" | "number"
            | "integer" | "float" | "double" => FieldType::Number,
            "timestamp" | "date32" | "date64" | "datetime" => FieldType::Timestamp,
            "boolean" | "bool" => FieldType::Boolean,
            "list" | "largelist" | "fixedsizelist" => FieldType::List,
            _ => FieldType::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Timestamp => "timestamp",
            FieldType::Boolean => "boolean",
            FieldType::List => "list",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
