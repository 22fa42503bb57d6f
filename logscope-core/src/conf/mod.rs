mod error;
mod loader;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use loader::{CONFIG_FILE, load_config, parse_config};
pub use types::{LogscopeConfig, PaginationConfig, QueryConfig, UrlConfig};
pub use validation::{Severity, ValidationIssue, ValidationReport, validate_config};
