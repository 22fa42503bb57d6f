use clap::{Parser, Subcommand};
use logscope_core::cli;
use logscope_core::cli::buckets::BucketsArgs;
use logscope_core::cli::compile::CompileArgs;
use logscope_core::cli::conf::ConfigCmd;
use logscope_core::cli::url::UrlCmd;
use logscope_core::logging::{LogMode, default_log_mode, init_logging};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "logscope",
    version,
    about = "Logscope: query compiler and URL state tooling for the log explorer"
)]
struct Cli {
    /// Log as JSON regardless of the terminal
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a rule tree into the explorer's queries
    Compile(CompileArgs),

    /// Decode or encode explorer URL parameters
    Url {
        #[command(subcommand)]
        cmd: UrlCmd,
    },

    /// Show the histogram bucket chosen for a range length
    Buckets(BucketsArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();

    let mode = if cli.json_logs {
        LogMode::Json
    } else {
        default_log_mode()
    };
    init_logging(mode);
    debug!(command = ?cli.command, "starting");

    let result = match cli.command {
        Command::Compile(args) => cli::compile::run(args),
        Command::Url { cmd } => cli::url::run(cmd),
        Command::Buckets(args) => cli::buckets::run(args),
        Command::Config { cmd } => cli::conf::run(cmd),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
