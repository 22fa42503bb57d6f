use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Json,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::Json => "json",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(ViewMode::Table),
            "json" => Ok(ViewMode::Json),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

/// Which editor backs the applied query: the rule tree or raw SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Filters,
    Sql,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Filters => "filters",
            FilterMode::Sql => "sql",
        }
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filters" => Ok(FilterMode::Filters),
            "sql" => Ok(FilterMode::Sql),
            other => Err(format!("unknown filter type '{other}'")),
        }
    }
}

/// Highlighted rows, inclusive, as shown in the `rowNumber` URL parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for RowRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| format!("row range '{s}' is not start:end"))?;
        let start: usize = start.parse().map_err(|_| format!("bad row '{start}'"))?;
        let end: usize = end.parse().map_err(|_| format!("bad row '{end}'"))?;
        if end < start {
            return Err(format!("row range '{s}' ends before it starts"));
        }
        Ok(RowRange { start, end })
    }
}
