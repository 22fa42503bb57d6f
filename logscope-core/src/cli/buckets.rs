use crate::time::{BucketInterval, DAY_MS, HOUR_MS, MINUTE_MS, PRESETS, Preset, bucket_interval};
use anyhow::{Context, Result, bail};
use clap::Args;

#[derive(Args, Debug)]
pub struct BucketsArgs {
    /// Range length: a preset token or <n><s|m|h|d>, e.g. 90m. Omit to list
    /// the bucket of every preset
    pub duration: Option<String>,

    /// Column the bucket expression is built on
    #[arg(long, default_value = "p_timestamp")]
    pub column: String,
}

pub fn run(args: BucketsArgs) -> Result<()> {
    let Some(duration) = args.duration else {
        for (preset, bucket) in preset_buckets() {
            println!("{:<4} {:<16} {}", preset.token, preset.label, bucket.as_str());
        }
        return Ok(());
    };

    let duration_ms = parse_duration_ms(&duration)?;
    let bucket = bucket_interval(duration_ms);

    println!("✔ range      {duration} ({duration_ms} ms)");
    println!("✔ bucket     {}", bucket.as_str());
    println!("✔ expression {}", bucket.sql_expr(&args.column));
    Ok(())
}

/// Range length in milliseconds.
pub fn parse_duration_ms(token: &str) -> Result<i64> {
    if let Some(preset) = Preset::from_token(token) {
        return Ok(preset.duration_ms);
    }

    let token = token.trim();
    let split = token
        .find(|c: char| !c.is_ascii_digit())
        .with_context(|| format!("duration '{token}' has no unit"))?;
    let (amount, unit) = token.split_at(split);

    let amount: i64 = amount
        .parse()
        .with_context(|| format!("duration '{token}' does not start with a number"))?;
    let unit_ms = match unit {
        "s" => 1000,
        "m" => MINUTE_MS,
        "h" => HOUR_MS,
        "d" => DAY_MS,
        other => bail!("unknown duration unit '{other}' (expected s, m, h or d)"),
    };

    if amount <= 0 {
        bail!("duration must be positive");
    }
    amount
        .checked_mul(unit_ms)
        .with_context(|| format!("duration '{token}' is too long"))
}

/// Bucket chosen for each preset, in preset order.
pub fn preset_buckets() -> Vec<(Preset, BucketInterval)> {
    PRESETS
        .iter()
        .map(|p| (*p, bucket_interval(p.duration_ms)))
        .collect()
}
