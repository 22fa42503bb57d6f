use super::{ConfigError, LogscopeConfig, validate_config};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "logscope.hcl";

/// Loads and validates a config file. `path` may name the file itself or
/// the directory holding `logscope.hcl`.
///
/// Warnings are logged; errors fail the load.
pub fn load_config(path: &Path) -> Result<LogscopeConfig, ConfigError> {
    let file = resolve_path(path);
    debug!(path = %file.display(), "loading config");

    let src = fs::read_to_string(&file).map_err(|e| ConfigError::read_file(&file, e))?;
    let config = parse_config(&src, &file)?;

    let report = validate_config(&config);
    for issue in &report.warnings {
        warn!(field = %issue.field, "{}", issue.message);
    }
    if report.has_errors() {
        return Err(ConfigError::Validation { report });
    }

    Ok(config)
}

/// Parses HCL without validating it.
pub fn parse_config(src: &str, path: &Path) -> Result<LogscopeConfig, ConfigError> {
    hcl::from_str(src).map_err(|e| ConfigError::parse(path, e))
}

fn resolve_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    }
}
