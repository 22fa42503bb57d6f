use super::catalog;
use crate::cli::compile::compile_queries;
use crate::cli::{RulesFile, highlight_sql};
use crate::error::ValidationError;
use crate::rules::{Combinator, QueryTree};
use crate::schema::FieldType;
use crate::time::resolve_custom;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

const TIME: &str =
    "\"p_timestamp\" BETWEEN '2024-05-01T12:00:00.000Z' AND '2024-05-01T13:00:00.000Z'";

#[test]
fn schema_file_type_tags_map_onto_field_types() {
    let catalog = catalog();

    assert_eq!(catalog.field_type("p_timestamp"), Some(FieldType::Timestamp));
    assert_eq!(catalog.field_type("host"), Some(FieldType::Text));
    assert_eq!(catalog.field_type("status"), Some(FieldType::Number));
    assert_eq!(catalog.field_type("cached"), Some(FieldType::Boolean));
    assert_eq!(catalog.field_type("tags"), Some(FieldType::List));
}

#[test]
fn rules_file_replays_through_the_editor() {
    // Arrange
    let file = RulesFile::from_json(
        r#"{
          "combinator": "and",
          "groups": [
            { "rules": [
                { "field": "status", "operator": ">=", "value": "500" },
                { "field": "host", "operator": "is null" } ] },
            { "combinator": "and",
              "rules": [ { "field": "cached", "operator": "=", "value": "true" } ] },
            { "rules": [] }
          ]
        }"#,
    )
    .unwrap();

    // Act
    let tree = file.build(&catalog()).unwrap();

    // Assert
    assert_eq!(tree.combinator, Combinator::And);
    assert_eq!(tree.groups.len(), 2);
    assert_eq!(tree.groups[0].combinator, Combinator::Or);
    assert_eq!(tree.groups[0].rules.len(), 2);
    assert_eq!(tree.groups[1].combinator, Combinator::And);
}

#[test]
fn rules_file_rejects_a_value_the_field_cannot_hold() {
    let file = RulesFile::from_json(
        r#"{ "groups": [ { "rules": [ { "field": "status", "operator": "=", "value": "abc" } ] } ] }"#,
    )
    .unwrap();

    let result = file.build(&catalog());

    assert!(matches!(result, Err(ValidationError::NotANumber { .. })));
}

#[test]
fn rules_file_rejects_unknown_keys() {
    let result = RulesFile::from_json(r#"{ "groups": [], "limit": 10 }"#);

    assert!(result.is_err());
}

#[test]
fn compile_queries_share_one_time_predicate() {
    // Arrange
    let file = RulesFile::from_json(
        r#"{ "groups": [ { "rules": [ { "field": "status", "operator": "=", "value": "500" } ] } ] }"#,
    )
    .unwrap();
    let catalog = catalog();
    let tree = file.build(&catalog).unwrap();
    let range = resolve_custom(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap(),
    )
    .unwrap();

    // Act
    let queries = compile_queries(&catalog, &tree, &range, "p_timestamp", 1000, 2000).unwrap();

    // Assert
    assert_eq!(queries.where_clause, "\"status\" = 500");
    assert_eq!(queries.time_predicate, TIME);
    assert_eq!(
        queries.select,
        format!(
            "SELECT * FROM \"web\" WHERE {TIME} AND (\"status\" = 500) ORDER BY \"p_timestamp\" DESC LIMIT 1000 OFFSET 2000"
        )
    );
    assert_eq!(
        queries.count,
        format!("SELECT COUNT(*) AS count FROM \"web\" WHERE {TIME} AND (\"status\" = 500)")
    );
    assert!(queries.histogram.starts_with("SELECT DATE_TRUNC('minute', \"p_timestamp\") AS bucket"));
}

#[test]
fn compile_refuses_incomplete_rules() {
    let file = RulesFile::from_json(
        r#"{ "groups": [ { "rules": [ { "field": "host", "operator": "=" } ] } ] }"#,
    )
    .unwrap();
    let catalog = catalog();
    let tree = file.build(&catalog).unwrap();
    let range = resolve_custom(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap(),
    )
    .unwrap();

    let result = compile_queries(&catalog, &tree, &range, "p_timestamp", 1000, 0);

    assert!(result.is_err());
    assert!(compile_queries(&catalog, &QueryTree::default(), &range, "p_timestamp", 1000, 0).is_ok());
}

#[test]
fn highlighting_leaves_quoted_text_alone() {
    // Arrange
    let sql = "SELECT * FROM \"web\" WHERE \"host\" = 'SELECT FROM'";

    // Act
    let highlighted = highlight_sql(sql);

    // Assert
    assert!(highlighted.ends_with("\"host\" = 'SELECT FROM'"));
    assert!(highlighted.contains("\u{1b}["));
    assert_ne!(highlighted, sql);
}
