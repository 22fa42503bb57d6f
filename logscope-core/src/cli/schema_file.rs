use crate::source::DeclaredSchema;
use serde::Deserialize;
use serde_json::Value;

/// Stream schema as returned by the backend's schema endpoint:
///
/// ```json
/// { "fields": [
///     { "name": "p_timestamp", "data_type": { "Timestamp": ["Millisecond", null] } },
///     { "name": "status", "data_type": "Int64" }
/// ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaFile {
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub data_type: Value,
}

impl SchemaFile {
    pub fn from_json(src: &str) -> serde_json::Result<Self> {
        serde_json::from_str(src)
    }

    /// `(field, type name)` pairs in schema order. Structured type names
    /// (`{"Timestamp": [...]}`, `{"List": {...}}`) are reduced to their tag.
    pub fn declared(&self) -> DeclaredSchema {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), type_name(&f.data_type)))
            .collect()
    }
}

fn type_name(data_type: &Value) -> String {
    match data_type {
        Value::String(s) => s.clone(),
        Value::Object(map) => map.keys().next().cloned().unwrap_or_default(),
        other => other.to_string(),
    }
}
