use crate::rules::{
    SelectBuilder, build_aggregate, build_count, build_select, wrap_raw_count, wrap_raw_select,
};
use crate::time::BucketInterval;
use pretty_assertions::assert_eq;

const TIME: &str = "\"p_timestamp\" BETWEEN '2024-05-01T12:24:00.000Z' AND '2024-05-01T12:34:00.000Z'";

#[test]
fn select_wraps_where_clause_after_time_predicate() {
    // Act
    let sql = build_select(
        "web",
        "\"status\" = 500",
        TIME,
        &[] as &[&str],
        "p_timestamp",
        1000,
        0,
    );

    // Assert
    assert_eq!(
        sql,
        format!(
            "SELECT * FROM \"web\" WHERE {TIME} AND (\"status\" = 500) ORDER BY \"p_timestamp\" DESC LIMIT 1000 OFFSET 0"
        )
    );
}

#[test]
fn empty_where_clause_omits_the_and_segment() {
    // Act
    let sql = build_select("web", "", TIME, &["host", "status"], "p_timestamp", 1000, 2000);

    // Assert
    assert_eq!(
        sql,
        format!(
            "SELECT \"host\", \"status\" FROM \"web\" WHERE {TIME} ORDER BY \"p_timestamp\" DESC LIMIT 1000 OFFSET 2000"
        )
    );
    assert!(!sql.contains("AND ()"));
}

#[test]
fn count_query_has_no_paging() {
    let sql = build_count("web", "\"status\" = 500", TIME);

    assert_eq!(
        sql,
        format!("SELECT COUNT(*) AS count FROM \"web\" WHERE {TIME} AND (\"status\" = 500)")
    );
}

#[test]
fn aggregate_query_groups_by_bucket() {
    let sql = build_aggregate("web", "", TIME, "p_timestamp", BucketInterval::Hour);

    assert_eq!(
        sql,
        format!(
            "SELECT DATE_TRUNC('hour', \"p_timestamp\") AS bucket, COUNT(*) AS count FROM \"web\" WHERE {TIME} GROUP BY bucket ORDER BY bucket ASC"
        )
    );
}

#[test]
fn raw_sql_is_wrapped_for_paging() {
    assert_eq!(
        wrap_raw_select("select * from web;  ", 1000, 1000),
        "SELECT * FROM (select * from web) AS q LIMIT 1000 OFFSET 1000"
    );
    assert_eq!(
        wrap_raw_count("select * from web"),
        "SELECT COUNT(*) AS count FROM (select * from web) AS q"
    );
}

#[test]
fn multiple_relations_share_the_where_clause() {
    // Act
    let sql = SelectBuilder::from_stream("a")
        .and_stream("b")
        .with_condition("\"a\".id = \"b\".id")
        .with_condition("")
        .build();

    // Assert
    assert_eq!(sql, "SELECT * FROM \"a\", \"b\" WHERE (\"a\".id = \"b\".id)");
}
