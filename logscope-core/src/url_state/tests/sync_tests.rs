use super::{loaded_state, run, settle};
use crate::explorer::{AppliedQuery, Command, Effect, FilterMode, RowRange, ViewMode};
use crate::rules::RulePatch;
use crate::time::{Preset, resolve_custom};
use crate::url_state::{UrlParamError, UrlParams, UrlSync};
use crate::window::{Direction, PerPage};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

#[test]
fn unknown_interval_leaves_time_range_alone() {
    // Arrange
    let sync = UrlSync::default();
    let state = loaded_state();
    let (params, errors) = sync.parse("?interval=10m");

    // Act
    let transition = sync.url_to_store(&state, &params);

    // Assert
    assert_eq!(errors.len(), 1);
    assert_eq!(transition.state.time_range(), state.time_range());
    assert!(transition.effects.is_empty());
}

#[test]
fn oversized_page_is_dropped_and_other_values_still_apply() {
    // Arrange
    let sync = UrlSync::default();
    let state = loaded_state();
    let (params, errors) = sync.parse("?page=18446744073709551615&view=json");

    // Act
    let transition = sync.url_to_store(&state, &params);

    // Assert
    assert_eq!(params.page, None);
    assert!(matches!(
        errors.as_slice(),
        [UrlParamError::BadValue { key: "page", .. }]
    ));
    assert_eq!(transition.state.view(), ViewMode::Json);
    assert_eq!(transition.state.absolute_page(), Some(1));
    assert!(transition.effects.is_empty());
}

#[test]
fn unaddressable_page_in_params_is_skipped() {
    // Arrange
    let sync = UrlSync::default();
    let state = loaded_state();
    let params = UrlParams {
        page: Some(usize::MAX),
        ..UrlParams::default()
    };

    // Act
    let transition = sync.url_to_store(&state, &params);

    // Assert
    assert_eq!(transition.state.absolute_page(), Some(1));
    assert_eq!(transition.state.window().chunk_offset(), 0);
    assert!(transition.effects.is_empty());
}

#[test]
fn applying_the_state_own_url_is_a_fixed_point() {
    // Arrange
    let sync = UrlSync::default();
    let state = loaded_state();
    let params = sync.params_from_state(&state);

    // Act
    let transition = sync.url_to_store(&state, &params);

    // Assert
    assert!(transition.effects.is_empty());
    assert_eq!(sync.params_from_state(&transition.state), params);
    assert_eq!(sync.store_to_url(&transition.state, &params), None);
}

#[test]
fn store_to_url_writes_only_on_change() {
    // Arrange
    let sync = UrlSync::default();
    let state = loaded_state();
    let current = sync.params_from_state(&state);
    let moved = run(&state, vec![Command::GotoPage(4)]);

    // Act
    let unchanged = sync.store_to_url(&state, &current);
    let changed = sync.store_to_url(&moved, &current);

    // Assert
    assert_eq!(unchanged, None);
    assert_eq!(changed.and_then(|p| p.page), Some(4));
}

#[test]
fn preset_range_is_written_as_interval() {
    let sync = UrlSync::default();
    let state = loaded_state();

    let params = sync.params_from_state(&state);

    assert_eq!(params.interval, Preset::from_token("1h"));
    assert_eq!(params.from, None);
    assert_eq!(params.to, None);
    assert_eq!(params.page, Some(1));
    assert_eq!(params.query, None);
    assert_eq!(params.filter_type, Some(FilterMode::Filters));
}

#[test]
fn fixed_range_state_round_trips_through_the_url() {
    // Arrange
    let sync = UrlSync::default();
    let original = run(
        &loaded_state(),
        vec![
            Command::SelectPreset(Preset::from_token("6h").unwrap()),
            Command::SetPerPage(PerPage::new(100).unwrap()),
            Command::GotoPage(4),
            Command::SetView(ViewMode::Json),
            Command::SetVisibleFields(vec!["host".into(), "status".into()]),
            Command::SetRowRange(Some(RowRange { start: 3, end: 5 })),
        ],
    );
    let query_string = sync.encode(&sync.params_from_state(&original));

    // Act
    let (params, errors) = sync.parse(&query_string);
    let restored = settle(sync.url_to_store(&loaded_state(), &params));

    // Assert
    assert!(errors.is_empty());
    assert_eq!(
        sync.params_from_state(&restored),
        sync.params_from_state(&original)
    );
    assert_eq!(restored.window().current_page(), 4);
    assert_eq!(restored.time_range(), original.time_range());
}

#[test]
fn custom_range_and_query_round_trip_into_a_later_chunk() {
    // Arrange
    let sync = UrlSync::default();
    let base = loaded_state();
    let with_group = run(&base, vec![Command::AddGroup]);
    let group = with_group.tree().groups[0].id;
    let rule = with_group.tree().groups[0].rules[0].id;
    let range = resolve_custom(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 30, 0).unwrap(),
    )
    .unwrap();
    let original = run(
        &with_group,
        vec![
            Command::UpdateRule {
                group,
                rule,
                patch: RulePatch::field("status"),
            },
            Command::UpdateRule {
                group,
                rule,
                patch: RulePatch::value("500"),
            },
            Command::ApplyFilters,
            Command::SetTimeRange(range),
            Command::AdvanceChunk(Direction::Next),
            Command::GotoPage(3),
        ],
    );
    let params = sync.params_from_state(&original);

    // Act
    let transition = sync.url_to_store(&base, &params);

    // Assert
    assert_eq!(params.page, Some(23));
    assert_eq!(params.query.as_deref(), Some("\"status\" = 500"));
    assert_eq!(params.interval, None);

    // Superseded reloads are pruned: one count, one chunk at the restored offset.
    assert_eq!(transition.effects.len(), 2);
    let chunk_sql = transition
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::FetchChunk { request, sql } => Some((request.offset, sql.clone())),
            Effect::FetchCount { .. } => None,
        })
        .unwrap();
    assert_eq!(chunk_sql.0, 1000);
    assert!(chunk_sql.1.contains("AND (\"status\" = 500)"));
    assert!(chunk_sql.1.ends_with("LIMIT 1000 OFFSET 1000"));

    let restored = settle(transition);
    assert_eq!(sync.params_from_state(&restored), params);
    assert_eq!(restored.window().current_page(), 3);
    assert_eq!(restored.window().chunk_offset(), 1000);
}

#[test]
fn sql_query_from_url_restores_raw_sql_mode() {
    // Arrange
    let sync = UrlSync::default();
    let params = sync.parse("?filterType=sql&query=SELECT+*+FROM+web").0;

    // Act
    let transition = sync.url_to_store(&loaded_state(), &params);

    // Assert
    assert_eq!(
        transition.state.applied(),
        &AppliedQuery::Sql {
            text: "SELECT * FROM web".into()
        }
    );
    assert_eq!(transition.state.raw_sql(), "SELECT * FROM web");
    assert_eq!(transition.state.filter_mode(), FilterMode::Sql);
    assert_eq!(
        transition.effects[0].sql(),
        "SELECT * FROM (SELECT * FROM web) AS q LIMIT 1000 OFFSET 0"
    );
}

#[test]
fn inverted_custom_range_is_skipped_and_the_rest_applied() {
    // Arrange
    let sync = UrlSync::default();
    let state = loaded_state();
    let params = UrlParams {
        from: Some(Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()),
        to: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        rows: PerPage::new(200),
        ..UrlParams::default()
    };

    // Act
    let transition = sync.url_to_store(&state, &params);

    // Assert
    assert_eq!(transition.state.time_range(), state.time_range());
    assert_eq!(transition.state.window().per_page().get(), 200);
    assert!(transition.effects.is_empty());
}

#[test]
fn page_inside_loaded_chunk_does_not_fetch() {
    let sync = UrlSync::default();
    let params = sync.parse("page=7").0;

    let transition = sync.url_to_store(&loaded_state(), &params);

    assert!(transition.effects.is_empty());
    assert_eq!(transition.state.window().current_page(), 7);
}
