use super::FieldType;
use crate::source::DeclaredSchema;
use serde::Serialize;

/// Field types of one stream, in schema order.
///
/// Built once from a schema fetch when the stream is selected and read-only
/// afterwards. Field order matters: the first field is the default field of a
/// new rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamFieldCatalog {
    stream_name: String,
    fields: Vec<(String, FieldType)>,
}

impl StreamFieldCatalog {
    pub fn new(stream_name: impl Into<String>, fields: Vec<(String, FieldType)>) -> Self {
        let mut deduped: Vec<(String, FieldType)> = Vec::with_capacity(fields.len());
        for (name, ty) in fields {
            if !deduped.iter().any(|(n, _)| *n == name) {
                deduped.push((name, ty));
            }
        }

        Self {
            stream_name: stream_name.into(),
            fields: deduped,
        }
    }

    pub fn from_declared(stream_name: impl Into<String>, schema: &DeclaredSchema) -> Self {
        Self::new(
            stream_name,
            schema
                .iter()
                .map(|(name, declared)| (name.clone(), FieldType::from_declared(declared)))
                .collect(),
        )
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, ty)| *ty)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.field_type(field).is_some()
    }

    pub fn first_field(&self) -> Option<(&str, FieldType)> {
        self.fields.first().map(|(name, ty)| (name.as_str(), *ty))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn fields(&self) -> &[(String, FieldType)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
