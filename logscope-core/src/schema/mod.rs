mod catalog;
mod field_type;

pub use catalog::StreamFieldCatalog;
pub use field_type::FieldType;
