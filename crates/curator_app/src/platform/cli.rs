use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use curator_core::Mode;

use super::logging::LogDestination;

/// Search for articles and pick the ones worth turning into a new article.
#[derive(Debug, Parser)]
#[command(name = "curator", version, about)]
pub struct Cli {
    /// Search query sent to the search provider.
    #[arg(short, long, required_unless_present = "records")]
    pub query: Option<String>,

    /// Classify results from a JSON file instead of searching.
    #[arg(long, value_name = "FILE")]
    pub records: Option<PathBuf>,

    /// Configuration file (mode, rules, search settings).
    #[arg(short, long, default_value = "curator.ron")]
    pub config: PathBuf,

    /// Override the configured classification mode.
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Flip the selection of a result by id; repeatable.
    #[arg(long = "toggle", value_name = "ID")]
    pub toggles: Vec<String>,

    /// Request article generation from the final selection.
    #[arg(long)]
    pub generate: bool,

    /// Write the effective mode and rules back to the config file.
    #[arg(long)]
    pub save_config: bool,

    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    pub log: LogArg,

    /// More log output (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Programmatic,
    Heuristic,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Programmatic => Mode::Programmatic,
            ModeArg::Heuristic => Mode::Heuristic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}
