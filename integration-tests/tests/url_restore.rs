mod common;

use logscope_core::explorer::{Command, ViewMode};
use logscope_core::time::Preset;
use logscope_core::url_state::UrlSync;
use logscope_core::window::PerPage;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn unknown_interval_in_the_url_changes_nothing() {
    // Arrange
    let mut driver = common::open_web(3000).await;
    let sync = UrlSync::default();
    let before = driver.state().time_range().clone();
    driver.source().clear_calls();
    let (params, errors) = sync.parse("?interval=10m");

    // Act
    driver.restore(&sync, &params).await;

    // Assert
    assert_eq!(errors.len(), 1);
    assert_eq!(driver.state().time_range(), &before);
    assert!(driver.source().calls().is_empty());
}

#[tokio::test]
async fn deep_link_lands_on_the_page_inside_its_chunk() {
    // Arrange
    let mut driver = common::open_web(3000).await;
    let sync = UrlSync::default();
    driver.source().clear_calls();
    let (params, _) = sync.parse("?interval=6h&page=23&rows=50");

    // Act
    driver.restore(&sync, &params).await;

    // Assert
    let queries = driver.source().queries();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].ends_with("LIMIT 1000 OFFSET 1000"));
    assert_eq!(driver.state().window().chunk_offset(), 1000);
    assert_eq!(driver.state().window().current_page(), 3);
    assert_eq!(driver.state().absolute_page(), Some(23));
    assert_eq!(driver.state().time_range().preset(), Preset::from_token("6h"));
}

#[tokio::test]
async fn written_url_restores_the_same_view_in_a_fresh_session() {
    // Arrange
    let sync = UrlSync::default();
    let mut first = common::open_web(3000).await;
    for command in [
        Command::SelectPreset(Preset::from_token("6h").unwrap()),
        Command::SetPerPage(PerPage::new(100).unwrap()),
        Command::GotoPage(4),
        Command::SetView(ViewMode::Json),
        Command::SetVisibleFields(vec!["host".into(), "status".into()]),
    ] {
        first.dispatch(command).await.unwrap();
    }
    let written = sync.params_from_state(first.state());
    let url = sync.encode(&written);

    // Act
    let mut second = common::open_web(3000).await;
    let (params, errors) = sync.parse(&url);
    second.restore(&sync, &params).await;

    // Assert
    assert!(errors.is_empty());
    assert_eq!(sync.params_from_state(second.state()), written);
    assert_eq!(sync.store_to_url(second.state(), &params), None);
    assert_eq!(second.state().absolute_page(), Some(4));
}
