use super::validation::is_valid_delimiter;
use crate::time::Preset;
use crate::window::{LOAD_LIMIT, PerPage};
use serde::{Deserialize, Serialize};

/// Contents of `logscope.hcl`. Every block and key is optional.
///
/// ```hcl
/// pagination {
///   load_limit       = 1000
///   default_per_page = 50
/// }
///
/// query {
///   time_column      = "p_timestamp"
///   default_interval = "1h"
/// }
///
/// url {
///   field_delimiter = ","
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogscopeConfig {
    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub url: UrlConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    /// Rows fetched per chunk.
    #[serde(default = "default_load_limit")]
    pub load_limit: usize,

    /// Rows per page for a freshly opened stream.
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Column every time predicate and `ORDER BY` is bound to.
    #[serde(default = "default_time_column")]
    pub time_column: String,

    /// Preset token used when no time range is given.
    #[serde(default = "default_interval")]
    pub default_interval: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UrlConfig {
    /// Separator of the `fields` URL parameter: one punctuation character.
    #[serde(default = "default_field_delimiter")]
    pub field_delimiter: String,
}

fn default_load_limit() -> usize {
    LOAD_LIMIT
}

fn default_per_page() -> usize {
    PerPage::default().get()
}

fn default_time_column() -> String {
    "p_timestamp".to_string()
}

fn default_interval() -> String {
    "1h".to_string()
}

fn default_field_delimiter() -> String {
    ",".to_string()
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            load_limit: default_load_limit(),
            default_per_page: default_per_page(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            time_column: default_time_column(),
            default_interval: default_interval(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            field_delimiter: default_field_delimiter(),
        }
    }
}

// The accessors below fall back to built-in defaults, so an unvalidated
// config still yields usable values.
impl LogscopeConfig {
    pub fn per_page(&self) -> PerPage {
        PerPage::new(self.pagination.default_per_page).unwrap_or_default()
    }

    pub fn load_limit(&self) -> usize {
        match self.pagination.load_limit {
            0 => LOAD_LIMIT,
            n => n,
        }
    }

    pub fn default_preset(&self) -> Preset {
        Preset::from_token(&self.query.default_interval)
            .or_else(|| Preset::from_token(&default_interval()))
            .unwrap_or(crate::time::PRESETS[0])
    }

    pub fn field_delimiter(&self) -> char {
        match self.url.field_delimiter.chars().next() {
            Some(c) if is_valid_delimiter(&self.url.field_delimiter) => c,
            _ => ',',
        }
    }
}
