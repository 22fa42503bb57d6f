use integration_tests::harness::{MemorySource, fixed_clock, rows};
use logscope_core::conf::LogscopeConfig;
use logscope_core::explorer::Driver;
use std::sync::Arc;

#[allow(dead_code)]
pub const WEB_SCHEMA: &[(&str, &str)] = &[
    ("p_timestamp", "Timestamp(Millisecond, None)"),
    ("host", "Utf8"),
    ("status", "Int64"),
];

#[allow(dead_code)]
pub fn web_source(n: usize) -> MemorySource {
    MemorySource::new().with_stream("web", WEB_SCHEMA, rows(n))
}

#[allow(dead_code)]
pub async fn open_web(n: usize) -> Driver<MemorySource> {
    open_with(web_source(n), &LogscopeConfig::default()).await
}

#[allow(dead_code)]
pub async fn open_with(source: MemorySource, config: &LogscopeConfig) -> Driver<MemorySource> {
    Driver::open(source, "web", config, Arc::new(fixed_clock()))
        .await
        .expect("failed to open stream")
}
