use super::compile::parse_preset;
use crate::explorer::{FilterMode, RowRange, ViewMode};
use crate::url_state::{MAX_PAGE, UrlParams};
use crate::window::PerPage;
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Subcommand, Debug)]
pub enum UrlCmd {
    /// Print the explorer parameters a query string sets
    Decode {
        /// Query string, with or without the leading '?'
        query: String,

        /// Separator of the `fields` parameter
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a query string from explorer parameters
    Encode(EncodeArgs),
}

#[derive(Args, Debug, Default)]
pub struct EncodeArgs {
    #[arg(long)]
    pub view: Option<ViewMode>,

    #[arg(long)]
    pub rows: Option<usize>,

    /// Absolute, 1-based page
    #[arg(long)]
    pub page: Option<usize>,

    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub interval: Option<String>,

    /// RFC 3339; written at minute resolution
    #[arg(long, requires = "to")]
    pub from: Option<DateTime<Utc>>,

    #[arg(long, requires = "from")]
    pub to: Option<DateTime<Utc>>,

    #[arg(long)]
    pub query: Option<String>,

    #[arg(long)]
    pub filter_type: Option<FilterMode>,

    /// Visible field; repeat for several
    #[arg(long = "field")]
    pub fields: Vec<String>,

    /// Highlighted rows as start:end
    #[arg(long)]
    pub row_number: Option<RowRange>,

    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
}

/// Parameters kept and dropped by a decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    pub params: BTreeMap<String, String>,
    pub dropped: Vec<String>,
}

pub fn run(cmd: UrlCmd) -> Result<()> {
    match cmd {
        UrlCmd::Decode {
            query,
            delimiter,
            json,
        } => {
            let report = decode(&query, delimiter);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        UrlCmd::Encode(args) => {
            let delimiter = args.delimiter;
            println!("?{}", encode_params(args)?.to_query_string(delimiter));
        }
    }
    Ok(())
}

/// Values are shown normalized: dates re-rendered in UTC, fields re-joined.
pub fn decode(query: &str, delimiter: char) -> DecodeReport {
    let (params, errors) = UrlParams::parse_query_string(query, delimiter);
    DecodeReport {
        params: params.to_map(delimiter),
        dropped: errors.iter().map(ToString::to_string).collect(),
    }
}

pub fn encode_params(args: EncodeArgs) -> Result<UrlParams> {
    let rows = match args.rows {
        Some(n) => match PerPage::new(n) {
            Some(rows) => Some(rows),
            None => bail!("rows must be one of {:?}", PerPage::ALLOWED),
        },
        None => None,
    };

    match args.page {
        Some(0) => bail!("page is 1-based"),
        Some(page) if page > MAX_PAGE => {
            bail!("page {page} is beyond the last addressable page ({MAX_PAGE})")
        }
        _ => {}
    }

    let interval = args.interval.as_deref().map(parse_preset).transpose()?;

    if let (Some(from), Some(to)) = (args.from, args.to) {
        if to <= from {
            bail!("'to' must be after 'from'");
        }
    }

    Ok(UrlParams {
        view: args.view,
        rows,
        page: args.page,
        interval,
        from: args.from,
        to: args.to,
        query: args.query.filter(|q| !q.trim().is_empty()),
        filter_type: args.filter_type,
        fields: Some(args.fields).filter(|f| !f.is_empty()),
        row_number: args.row_number,
    })
}

fn print_report(report: &DecodeReport) {
    for (key, value) in &report.params {
        println!("✔ {key:<10} {value}");
    }
    for dropped in &report.dropped {
        println!("{} {dropped}", "✖".red());
    }
}
