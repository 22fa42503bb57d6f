mod common;

use integration_tests::harness::{SourceCall, capture_tracing};
use logscope_core::explorer::{Command, apply};
use logscope_core::rules::RulePatch;
use logscope_core::window::{Direction, PerPage, WindowStatus};
use logscope_core::{FetchError, ValidationError};
use pretty_assertions::assert_eq;

const PAST_HOUR: &str =
    "\"p_timestamp\" BETWEEN '2024-05-01T11:34:00.000Z' AND '2024-05-01T12:34:00.000Z'";

#[tokio::test]
async fn applied_rule_reaches_the_backend_as_one_select() {
    // Arrange
    let mut driver = common::open_web(3000).await;
    driver.dispatch(Command::AddGroup).await.unwrap();
    let group = driver.state().tree().groups[0].id;
    let rule = driver.state().tree().groups[0].rules[0].id;
    driver
        .dispatch(Command::UpdateRule {
            group,
            rule,
            patch: RulePatch::field("status"),
        })
        .await
        .unwrap();
    driver
        .dispatch(Command::UpdateRule {
            group,
            rule,
            patch: RulePatch::value("500"),
        })
        .await
        .unwrap();
    driver.source().clear_calls();

    // Act
    driver.dispatch(Command::ApplyFilters).await.unwrap();

    // Assert
    assert_eq!(
        driver.source().calls(),
        vec![
            SourceCall::Query(format!(
                "SELECT * FROM \"web\" WHERE {PAST_HOUR} AND (\"status\" = 500) \
                 ORDER BY \"p_timestamp\" DESC LIMIT 1000 OFFSET 0"
            )),
            SourceCall::Count(format!(
                "SELECT COUNT(*) AS count FROM \"web\" WHERE {PAST_HOUR} AND (\"status\" = 500)"
            )),
        ]
    );
}

#[tokio::test]
async fn first_chunk_is_paged_without_refetching() {
    // Arrange
    let mut driver = common::open_web(3000).await;
    let calls_after_open = driver.source().calls().len();

    // Act
    let pages_at_50 = driver.state().total_pages();
    driver
        .dispatch(Command::SetPerPage(PerPage::new(100).unwrap()))
        .await
        .unwrap();
    driver.dispatch(Command::GotoPage(10)).await.unwrap();

    // Assert
    assert_eq!(pages_at_50, 20);
    assert_eq!(driver.state().total_pages(), 10);
    assert_eq!(driver.state().display_count(), 100);
    assert_eq!(driver.state().absolute_page(), Some(10));
    assert_eq!(driver.source().calls().len(), calls_after_open);
}

#[tokio::test]
async fn next_chunk_starts_on_its_first_page() {
    // Arrange
    let mut driver = common::open_web(3000).await;
    driver.dispatch(Command::GotoPage(20)).await.unwrap();

    // Act
    driver
        .dispatch(Command::AdvanceChunk(Direction::Next))
        .await
        .unwrap();

    // Assert
    assert!(driver.source().queries().last().unwrap().ends_with("LIMIT 1000 OFFSET 1000"));
    assert_eq!(driver.state().window().current_page(), 1);
    assert_eq!(driver.state().absolute_page(), Some(21));
    assert_eq!(driver.state().total_count(), Some(3000));
}

#[tokio::test]
async fn failed_chunk_is_retried_with_identical_sql() {
    // Arrange
    let mut driver = common::open_web(3000).await;
    driver.source().fail_next(FetchError::transient("gateway timeout"));
    let capture = capture_tracing();

    // Act
    driver
        .dispatch(Command::AdvanceChunk(Direction::Next))
        .await
        .unwrap();
    let status = driver.state().window().status().clone();
    driver.dispatch(Command::Retry).await.unwrap();

    // Assert
    assert!(matches!(status, WindowStatus::Failed(FetchError::Transient { .. })));
    let queries = driver.source().queries();
    let n = queries.len();
    assert_eq!(queries[n - 1], queries[n - 2]);
    assert_eq!(driver.state().window().status(), &WindowStatus::Ready);
    let failures = capture.find("chunk fetch failed");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].level, tracing::Level::WARN);
    assert_eq!(failures[0].field("offset"), Some("1000"));
}

#[tokio::test]
async fn responses_for_a_superseded_query_are_dropped() {
    // Arrange
    let mut driver = common::open_web(3000).await;
    let stale = apply(driver.state(), Command::Refresh).unwrap().effects;
    driver.dispatch(Command::Refresh).await.unwrap();
    driver.dispatch(Command::Refresh).await.unwrap();
    let generation = driver.state().window().generation();
    let capture = capture_tracing();

    // Act
    driver.run(stale).await;

    // Assert
    assert_eq!(driver.state().window().generation(), generation);
    assert_eq!(driver.state().window().status(), &WindowStatus::Ready);
    assert!(capture.contains("dropping stale chunk response"));
    assert!(capture.contains("dropping stale count response"));
}

#[tokio::test]
async fn raw_sql_rejected_when_blank() {
    let mut driver = common::open_web(10).await;

    let result = driver.dispatch(Command::ApplyRawSql).await;

    assert_eq!(result, Err(ValidationError::EmptyQuery));
}

#[tokio::test]
async fn opening_an_unknown_stream_fails() {
    let result = logscope_core::explorer::Driver::open(
        common::web_source(10),
        "dns",
        &logscope_core::conf::LogscopeConfig::default(),
        std::sync::Arc::new(integration_tests::harness::fixed_clock()),
    )
    .await;

    assert!(matches!(result, Err(FetchError::Transient { .. })));
}
