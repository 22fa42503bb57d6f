mod select_tests;

use crate::schema::{FieldType, StreamFieldCatalog};

pub(super) fn catalog() -> StreamFieldCatalog {
    StreamFieldCatalog::new(
        "web",
        vec![
            ("status".into(), FieldType::Number),
            ("host".into(), FieldType::Text),
            ("p_timestamp".into(), FieldType::Timestamp),
            ("cached".into(), FieldType::Boolean),
            ("tags".into(), FieldType::List),
        ],
    )
}
