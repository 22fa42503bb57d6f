use chrono::{TimeZone, Utc};
use integration_tests::harness::{MemorySource, SourceCall, capture_tracing, rows};
use logscope_core::ValidationError;
use logscope_core::correlation::{CorrelationCommand, CorrelationDriver, CorrelationState, apply};
use logscope_core::rules::{
    Combinator, GroupId, Operator, QueryTree, Rule, RuleGroup, RuleId, RuleValue,
};
use logscope_core::source::{Row, Scalar};
use logscope_core::time::resolve_custom;
use logscope_core::window::PerPage;
use pretty_assertions::assert_eq;

const WEB: &[(&str, &str)] = &[
    ("p_timestamp", "Timestamp(Millisecond, None)"),
    ("host", "Utf8"),
    ("status", "Int64"),
];

const AUTH: &[(&str, &str)] = &[
    ("p_timestamp", "Timestamp(Millisecond, None)"),
    ("host", "Utf8"),
    ("user", "Utf8"),
];

fn auth_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let mut row = Row::new();
            row.insert("host".into(), Scalar::Text(format!("h{}", i % 3)));
            row.insert("user".into(), Scalar::Text(format!("u{i}")));
            row
        })
        .collect()
}

fn source() -> MemorySource {
    MemorySource::new()
        .with_stream("web", WEB, rows(120))
        .with_stream("auth", AUTH, auth_rows(30))
}

fn state() -> CorrelationState {
    let range = resolve_custom(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap(),
    )
    .unwrap();
    CorrelationState::new(range, "p_timestamp", PerPage::default(), 1000)
}

async fn web_and_auth() -> CorrelationDriver<MemorySource> {
    let mut driver = CorrelationDriver::new(source(), state());
    for stream in ["web", "auth"] {
        let catalog = driver.catalog(stream).await.unwrap();
        driver
            .dispatch(CorrelationCommand::AddStream(catalog))
            .await
            .unwrap();
    }
    driver
}

async fn join_on_host(driver: &mut CorrelationDriver<MemorySource>) {
    driver
        .dispatch(CorrelationCommand::SetJoinCondition {
            left_field: "host".into(),
            right_field: "host".into(),
        })
        .await
        .unwrap();
}

async fn joined() -> CorrelationDriver<MemorySource> {
    let mut driver = web_and_auth().await;
    join_on_host(&mut driver).await;
    driver.dispatch(CorrelationCommand::Correlate).await.unwrap();
    driver
}

#[tokio::test]
async fn mismatched_join_types_block_correlation() {
    // Arrange
    let mut driver = web_and_auth().await;
    driver
        .dispatch(CorrelationCommand::SetJoinCondition {
            left_field: "status".into(),
            right_field: "user".into(),
        })
        .await
        .unwrap();

    // Act
    let result = driver.dispatch(CorrelationCommand::Correlate).await;

    // Assert
    assert_eq!(
        result,
        Err(ValidationError::IncompatibleJoinTypes {
            left: "web.status".into(),
            left_type: "number".into(),
            right: "auth.user".into(),
            right_type: "text".into(),
        })
    );
    assert!(!driver.state().is_joined());
    assert_eq!(driver.state().combine(), Err(ValidationError::NotJoined));
}

#[tokio::test]
async fn joined_streams_are_fetched_with_the_pushed_down_equality() {
    // Arrange
    let mut driver = web_and_auth().await;
    join_on_host(&mut driver).await;
    driver.source().clear_calls();

    // Act
    driver.dispatch(CorrelationCommand::Correlate).await.unwrap();

    // Assert
    let queries = driver.source().queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[0].starts_with("SELECT \"web\".* FROM \"web\", \"auth\" WHERE"));
    assert!(queries[0].contains("AND (\"web\".\"host\" = \"auth\".\"host\")"));
    assert!(queries[1].starts_with("SELECT \"auth\".* FROM \"web\", \"auth\" WHERE"));
    assert_eq!(driver.state().window("web").unwrap().chunk().len(), 120);
    assert_eq!(driver.state().window("auth").unwrap().chunk().len(), 30);
}

#[tokio::test]
async fn both_streams_report_the_joined_row_count() {
    // Arrange
    let mut driver = web_and_auth().await;
    join_on_host(&mut driver).await;
    driver.source().clear_calls();

    // Act
    driver.dispatch(CorrelationCommand::Correlate).await.unwrap();

    // Assert
    let counts: Vec<String> = driver
        .source()
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            SourceCall::Count(sql) => Some(sql),
            _ => None,
        })
        .collect();
    assert_eq!(counts.len(), 2);
    assert!(counts[0].starts_with("SELECT COUNT(*) AS count FROM \"web\", \"auth\" WHERE"));
    assert_eq!(counts[0], counts[1]);
    // the in-memory backend counts the first relation
    assert_eq!(driver.state().window("web").unwrap().total_count(), Some(120));
    assert_eq!(driver.state().window("auth").unwrap().total_count(), Some(120));
}

#[tokio::test]
async fn filters_on_a_shared_field_name_stay_unambiguous() {
    // Arrange
    let mut driver = joined().await;
    driver.source().clear_calls();
    let tree = QueryTree {
        combinator: Combinator::And,
        groups: vec![RuleGroup {
            id: GroupId::new(),
            combinator: Combinator::And,
            rules: vec![Rule {
                id: RuleId::new(),
                field: "host".into(),
                operator: Operator::Equal,
                value: RuleValue::Text("h1".into()),
            }],
        }],
    };

    // Act
    driver
        .dispatch(CorrelationCommand::ApplyFilters {
            stream: "auth".into(),
            tree,
        })
        .await
        .unwrap();

    // Assert
    let calls = driver.source().calls();
    assert_eq!(calls.len(), 4);
    for call in &calls {
        let sql = call.sql().unwrap();
        assert!(sql.contains("AND (\"auth\".\"host\" = 'h1')"), "{sql}");
        assert!(!sql.contains("(\"host\" = 'h1')"), "{sql}");
    }
}

#[tokio::test]
async fn combined_rows_zip_the_current_pages_by_position() {
    // Arrange
    let mut driver = joined().await;
    for (stream, field) in [("web", "status"), ("auth", "user")] {
        driver
            .dispatch(CorrelationCommand::SelectField {
                stream: stream.into(),
                field: field.into(),
            })
            .await
            .unwrap();
    }

    // Act
    let combined = driver.state().combine().unwrap();

    // Assert
    // web shows 50 rows on its first page, auth all 30
    assert_eq!(combined.len(), 50);
    assert_eq!(combined[0].get("web.status"), Some(&Scalar::Int(500)));
    assert_eq!(combined[0].get("auth.user"), Some(&Scalar::Text("u0".into())));
    assert_eq!(combined[40].get("auth.user"), None);
    assert!(combined.iter().all(|r| !r.contains_key("web.host")));
}

#[tokio::test]
async fn removing_a_stream_drops_the_join_and_late_responses() {
    // Arrange
    let mut driver = web_and_auth().await;
    join_on_host(&mut driver).await;
    let pending = apply(driver.state(), CorrelationCommand::Correlate).unwrap();
    let capture = capture_tracing();

    // Act
    driver
        .dispatch(CorrelationCommand::RemoveStream {
            stream: "auth".into(),
        })
        .await
        .unwrap();
    driver.run(pending.effects).await;

    // Assert
    let state = driver.state();
    assert_eq!(state.join_condition(), None);
    assert!(!state.is_joined());
    assert_eq!(state.streams().collect::<Vec<_>>(), vec!["web"]);
    assert!(capture.contains("dropping response for removed stream"));
}
