use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lv",
    about = "LedgerView: replay client operations and inspect the resulting state",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply an operation log and print the resulting snapshot
    Replay(ReplayArgs),
    /// Decode every operation in a log without applying it
    Check(CheckArgs),
    /// Print the effective store configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Operation log, one JSON operation per line
    pub log: PathBuf,
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print only the subtree at this path (a segment or a JSON array of segments)
    #[arg(long, conflicts_with = "content")]
    pub path: Option<String>,
    /// Print only the content entry with this `author/permlink` key
    #[arg(long)]
    pub content: Option<String>,
    /// Show one page of the selected list, 0 being the newest
    #[arg(long)]
    pub page: Option<usize>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub log: PathBuf,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML configuration file; defaults apply when omitted
    pub path: Option<PathBuf>,
}
