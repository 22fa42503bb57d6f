use crate::conf::{CONFIG_FILE, ConfigError, LogscopeConfig, load_config, parse_config};
use crate::window::PerPage;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn write_config(contents: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), contents).unwrap();
    dir
}

#[test]
fn empty_file_yields_defaults() {
    // Arrange
    let dir = write_config("");

    // Act
    let config = load_config(dir.path()).unwrap();

    // Assert
    assert_eq!(config, LogscopeConfig::default());
    assert_eq!(config.load_limit(), 1000);
    assert_eq!(config.per_page(), PerPage::default());
    assert_eq!(config.query.time_column, "p_timestamp");
    assert_eq!(config.default_preset().token, "1h");
    assert_eq!(config.field_delimiter(), ',');
}

#[test]
fn blocks_override_defaults() {
    // Arrange
    let dir = write_config(
        r#"
        pagination {
          load_limit       = 2000
          default_per_page = 100
        }

        query {
          time_column      = "ts"
          default_interval = "15m"
        }

        url {
          field_delimiter = ";"
        }
        "#,
    );

    // Act
    let config = load_config(&dir.path().join(CONFIG_FILE)).unwrap();

    // Assert
    assert_eq!(config.load_limit(), 2000);
    assert_eq!(config.per_page().get(), 100);
    assert_eq!(config.query.time_column, "ts");
    assert_eq!(config.default_preset().token, "15m");
    assert_eq!(config.field_delimiter(), ';');
}

#[test]
fn partial_block_keeps_other_defaults() {
    let config = parse_config(
        "pagination {\n  default_per_page = 200\n}\n",
        Path::new("inline.hcl"),
    )
    .unwrap();

    assert_eq!(config.pagination.default_per_page, 200);
    assert_eq!(config.pagination.load_limit, 1000);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = load_config(dir.path());

    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}

#[test]
fn unknown_key_is_a_parse_error() {
    let dir = write_config("pagination {\n  page_size = 10\n}\n");

    let result = load_config(dir.path());

    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn invalid_values_fail_validation() {
    // Arrange
    let dir = write_config(
        r#"
        pagination {
          load_limit       = 0
          default_per_page = 75
        }
        "#,
    );

    // Act
    let result = load_config(dir.path());

    // Assert
    let Err(ConfigError::Validation { report }) = result else {
        panic!("expected validation error, got {result:?}");
    };
    let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["pagination.load_limit", "pagination.default_per_page"]
    );
}

#[test]
fn warnings_do_not_fail_the_load() {
    let dir = write_config("pagination {\n  default_per_page = 150\n}\n");

    let config = load_config(dir.path()).unwrap();

    assert_eq!(config.per_page().get(), 150);
}
