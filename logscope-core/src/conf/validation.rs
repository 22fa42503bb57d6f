use super::LogscopeConfig;
use crate::time::Preset;
use crate::window::PerPage;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Chunks beyond this size are accepted but flagged.
const LARGE_LOAD_LIMIT: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Dotted key the issue is about, e.g. `pagination.load_limit`.
    pub field: String,
    pub message: String,
    pub help: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

pub fn validate_config(config: &LogscopeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    let load_limit = config.pagination.load_limit;
    let per_page = config.pagination.default_per_page;

    if load_limit == 0 {
        report.zero_load_limit();
    } else if load_limit > LARGE_LOAD_LIMIT {
        report.large_load_limit(load_limit);
    }

    if PerPage::new(per_page).is_none() {
        report.invalid_per_page(per_page);
    } else if load_limit > 0 && load_limit % per_page != 0 {
        report.uneven_chunk(load_limit, per_page);
    }

    if config.query.time_column.trim().is_empty() {
        report.empty_time_column();
    }

    if Preset::from_token(&config.query.default_interval).is_none() {
        report.unknown_interval(&config.query.default_interval);
    }

    if !is_valid_delimiter(&config.url.field_delimiter) {
        report.invalid_delimiter(&config.url.field_delimiter);
    }

    report
}

/// One ASCII punctuation character that field names are never left
/// unescaped with.
pub(crate) fn is_valid_delimiter(delimiter: &str) -> bool {
    let mut chars = delimiter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_punctuation() && !matches!(c, '_' | '-' | '.' | '%'),
        _ => false,
    }
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    fn error(&mut self, field: &str, message: String, help: Option<String>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            field: field.to_string(),
            message,
            help,
        });
    }

    fn warning(&mut self, field: &str, message: String, help: Option<String>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            field: field.to_string(),
            message,
            help,
        });
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_plain(&self) {
        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };

            println!("{}: {}: {}", issue.field, severity, issue.message);

            if let Some(help) = &issue.help {
                println!("  help: {}", help);
            }
        }
    }

    pub fn render_pretty(&self) {
        if self.has_violations() {
            println!(
                "configuration validation failed ({} errors, {} warnings)\n",
                self.errors.len(),
                self.warnings.len()
            );
        }

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            match issue.severity {
                Severity::Error => {
                    println!("  {}: {}: {}", "error".red().bold(), issue.field, issue.message);
                }
                Severity::Warning => {
                    println!(
                        "  {}: {}: {}",
                        "warning".yellow().bold(),
                        issue.field,
                        issue.message
                    );
                }
            }

            if let Some(help) = &issue.help {
                println!("    {} {}", "help:".cyan(), help);
            }

            println!();
        }
    }
}

/// Pagination
impl ValidationReport {
    fn zero_load_limit(&mut self) {
        self.error(
            "pagination.load_limit",
            "load_limit must be greater than zero".to_string(),
            None,
        );
    }

    fn large_load_limit(&mut self, load_limit: usize) {
        self.warning(
            "pagination.load_limit",
            format!("load_limit {load_limit} is unusually large"),
            Some(format!(
                "Every chunk is held in memory; {LARGE_LOAD_LIMIT} rows or fewer is recommended."
            )),
        );
    }

    fn invalid_per_page(&mut self, per_page: usize) {
        self.error(
            "pagination.default_per_page",
            format!("invalid rows per page: {per_page}"),
            Some(format!("Use one of {:?}.", PerPage::ALLOWED)),
        );
    }

    fn uneven_chunk(&mut self, load_limit: usize, per_page: usize) {
        self.warning(
            "pagination.load_limit",
            format!("load_limit {load_limit} is not a multiple of default_per_page {per_page}"),
            Some("The last page of every chunk will be short.".to_string()),
        );
    }
}

/// Query
impl ValidationReport {
    fn empty_time_column(&mut self) {
        self.error(
            "query.time_column",
            "time_column must not be empty".to_string(),
            None,
        );
    }

    fn unknown_interval(&mut self, token: &str) {
        let known: Vec<&str> = crate::time::PRESETS.iter().map(|p| p.token).collect();
        self.error(
            "query.default_interval",
            format!("unknown interval '{token}'"),
            Some(format!("Use one of: {}.", known.join(", "))),
        );
    }
}

/// URL
impl ValidationReport {
    fn invalid_delimiter(&mut self, delimiter: &str) {
        self.error(
            "url.field_delimiter",
            format!("invalid field_delimiter '{delimiter}'"),
            Some(
                "Use a single punctuation character other than '_', '-', '.' or '%'.".to_string(),
            ),
        );
    }
}
