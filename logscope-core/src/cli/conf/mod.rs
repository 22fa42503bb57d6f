mod check;
mod dump;

pub use check::*;
use clap::Subcommand;
pub use dump::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Config file, or directory holding logscope.hcl
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Plain output, no colors
        #[arg(short, long, default_value = "false")]
        plain: bool,

        /// Print the validation report as JSON
        #[arg(long, conflicts_with = "plain")]
        json: bool,
    },

    /// Print resolved configuration as JSON
    Dump {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path, plain, json } => check(path, plain, json),
        ConfigCmd::Dump { path } => dump(path),
    }
}
