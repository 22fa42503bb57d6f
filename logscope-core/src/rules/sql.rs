/// Double-quotes an identifier. Field names are always quoted so that names
/// like `level` or `user` cannot collide with SQL keywords.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `"relation"."column"`, for queries over more than one stream.
pub fn qualify_ident(relation: &str, column: &str) -> String {
    format!("{}.{}", quote_ident(relation), quote_ident(column))
}

pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
