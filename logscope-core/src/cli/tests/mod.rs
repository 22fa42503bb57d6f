mod buckets_tests;
mod compile_tests;

use crate::cli::SchemaFile;
use crate::schema::StreamFieldCatalog;

pub(super) const SCHEMA: &str = r#"{
  "fields": [
    { "name": "p_timestamp", "data_type": { "Timestamp": ["Millisecond", null] } },
    { "name": "host", "data_type": "Utf8" },
    { "name": "status", "data_type": "Int64" },
    { "name": "cached", "data_type": "Boolean" },
    { "name": "tags", "data_type": { "List": { "name": "item", "data_type": "Utf8" } } }
  ]
}"#;

pub(super) fn catalog() -> StreamFieldCatalog {
    let schema = SchemaFile::from_json(SCHEMA).unwrap();
    StreamFieldCatalog::from_declared("web", &schema.declared())
}
