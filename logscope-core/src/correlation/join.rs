use crate::error::ValidationError;
use crate::rules::qualify_ident;
use crate::schema::{FieldType, StreamFieldCatalog};
use serde::{Deserialize, Serialize};

/// Equality between one field of the first stream and one of the second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCondition {
    pub left_field: String,
    pub right_field: String,
}

/// Checks that `left_field` and `right_field` may be joined: both exist,
/// neither is a list, and their types match.
pub fn check_join(
    left: &StreamFieldCatalog,
    left_field: &str,
    right: &StreamFieldCatalog,
    right_field: &str,
) -> Result<(), ValidationError> {
    let left_type = resolve(left, left_field)?;
    let right_type = resolve(right, right_field)?;

    if left_type != right_type {
        return Err(ValidationError::IncompatibleJoinTypes {
            left: format!("{}.{left_field}", left.stream_name()),
            left_type: left_type.to_string(),
            right: format!("{}.{right_field}", right.stream_name()),
            right_type: right_type.to_string(),
        });
    }

    Ok(())
}

fn resolve(catalog: &StreamFieldCatalog, field: &str) -> Result<FieldType, ValidationError> {
    match catalog.field_type(field) {
        None => Err(ValidationError::UnknownField {
            stream: catalog.stream_name().to_string(),
            field: field.to_string(),
        }),
        Some(FieldType::List) => Err(ValidationError::ListJoinField {
            field: format!("{}.{field}", catalog.stream_name()),
        }),
        Some(ty) => Ok(ty),
    }
}

/// `"a"."x" = "b"."y"`
pub fn join_predicate(
    left_stream: &str,
    left_field: &str,
    right_stream: &str,
    right_field: &str,
) -> String {
    format!(
        "{} = {}",
        qualify_ident(left_stream, left_field),
        qualify_ident(right_stream, right_field)
    )
}
