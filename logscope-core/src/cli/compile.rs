use super::{RulesFile, SchemaFile, highlight_sql};
use crate::conf::{LogscopeConfig, load_config};
use crate::rules::{QueryTree, build_aggregate, build_count, build_select, compile, validate};
use crate::schema::StreamFieldCatalog;
use crate::time::{
    Clock, FixedClock, PRESETS, Preset, SystemClock, TimeRange, bucket_interval, resolve_custom,
    resolve_preset,
};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Stream schema JSON, as returned by the schema endpoint
    #[arg(long)]
    pub schema: PathBuf,

    /// Rule tree JSON; omit to select everything in the time range
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Stream to query
    #[arg(long)]
    pub stream: String,

    /// Relative range token (1m, 5m, ..., 30d)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub interval: Option<String>,

    /// Range start, RFC 3339
    #[arg(long, requires = "to")]
    pub from: Option<DateTime<Utc>>,

    /// Range end, RFC 3339
    #[arg(long, requires = "from")]
    pub to: Option<DateTime<Utc>>,

    /// Rows per chunk; defaults to the configured load limit
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Resolve relative ranges against this instant instead of the system clock
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    /// Config file or directory holding logscope.hcl
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of highlighted SQL
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledQueries {
    pub where_clause: String,
    pub time_predicate: String,
    pub select: String,
    pub count: String,
    pub histogram: String,
}

pub fn run(args: CompileArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => LogscopeConfig::default(),
    };

    let src = fs::read_to_string(&args.schema)
        .with_context(|| format!("failed to read schema file {}", args.schema.display()))?;
    let schema = SchemaFile::from_json(&src).context("invalid schema file")?;
    let catalog = StreamFieldCatalog::from_declared(&args.stream, &schema.declared());

    let tree = match &args.rules {
        Some(path) => {
            let src = fs::read_to_string(path)
                .with_context(|| format!("failed to read rules file {}", path.display()))?;
            RulesFile::from_json(&src)
                .context("invalid rules file")?
                .build(&catalog)?
        }
        None => QueryTree::default(),
    };

    let clock: Box<dyn Clock> = match args.now {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    };
    let range = resolve_range(clock.as_ref(), &config, &args)?;

    let queries = compile_queries(
        &catalog,
        &tree,
        &range,
        &config.query.time_column,
        args.limit.unwrap_or(config.load_limit()),
        args.offset,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&queries)?);
    } else {
        print_queries(&queries);
    }

    Ok(())
}

/// Every query the explorer would issue for `tree` over `range`.
pub fn compile_queries(
    catalog: &StreamFieldCatalog,
    tree: &QueryTree,
    range: &TimeRange,
    time_column: &str,
    limit: usize,
    offset: usize,
) -> Result<CompiledQueries> {
    validate(tree)?;

    let stream = catalog.stream_name();
    let where_clause = compile(tree, catalog);
    let time_predicate = range.sql_predicate(time_column);

    Ok(CompiledQueries {
        select: build_select(
            stream,
            &where_clause,
            &time_predicate,
            &[] as &[String],
            time_column,
            limit,
            offset,
        ),
        count: build_count(stream, &where_clause, &time_predicate),
        histogram: build_aggregate(
            stream,
            &where_clause,
            &time_predicate,
            time_column,
            bucket_interval(range.interval_ms()),
        ),
        where_clause,
        time_predicate,
    })
}

fn resolve_range(clock: &dyn Clock, config: &LogscopeConfig, args: &CompileArgs) -> Result<TimeRange> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        return Ok(resolve_custom(from, to)?);
    }

    let preset = match &args.interval {
        Some(token) => parse_preset(token)?,
        None => config.default_preset(),
    };
    Ok(resolve_preset(clock, preset))
}

pub(crate) fn parse_preset(token: &str) -> Result<Preset> {
    Preset::from_token(token).ok_or_else(|| {
        let known: Vec<&str> = PRESETS.iter().map(|p| p.token).collect();
        anyhow!("unknown interval '{token}' (expected one of {})", known.join(", "))
    })
}

fn print_queries(queries: &CompiledQueries) {
    let where_clause = if queries.where_clause.is_empty() {
        "(none)".to_string()
    } else {
        highlight_sql(&queries.where_clause)
    };

    println!("where      {where_clause}");
    println!("select     {}", highlight_sql(&queries.select));
    println!("count      {}", highlight_sql(&queries.count));
    println!("histogram  {}", highlight_sql(&queries.histogram));
}
