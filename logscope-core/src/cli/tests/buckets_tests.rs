use crate::cli::buckets::{parse_duration_ms, preset_buckets};
use crate::time::{BucketInterval, DAY_MS, HOUR_MS, MINUTE_MS};
use pretty_assertions::assert_eq;

#[test]
fn durations_accept_presets_and_free_amounts() {
    assert_eq!(parse_duration_ms("1h").unwrap(), HOUR_MS);
    assert_eq!(parse_duration_ms("90m").unwrap(), 90 * MINUTE_MS);
    assert_eq!(parse_duration_ms("45s").unwrap(), 45_000);
    assert_eq!(parse_duration_ms("2d").unwrap(), 2 * DAY_MS);
}

#[test]
fn malformed_durations_are_rejected() {
    for token in ["", "90", "m", "0m", "5w", "1.5h"] {
        assert!(parse_duration_ms(token).is_err(), "{token}");
    }
}

#[test]
fn every_preset_has_a_bucket() {
    let buckets = preset_buckets();

    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets[0].1, BucketInterval::Minute);
    assert_eq!(buckets[4].1, BucketInterval::Minute);
    assert_eq!(buckets[5].1, BucketInterval::QuarterHour);
    assert_eq!(buckets[11].1, BucketInterval::Day);
}

#[test]
fn durations_too_long_for_milliseconds_are_rejected() {
    // Act
    let result = parse_duration_ms("999999999999999d");

    // Assert
    let err = result.unwrap_err();
    assert!(err.to_string().contains("too long"), "{err}");
}
