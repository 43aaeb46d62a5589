//! CLI struct definitions for the gurume command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use crate::core::config::MergeStrategy;
use crate::core::store::Dimension;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "gurume",
    version = env!("CARGO_PKG_VERSION"),
    about = "Fold scraped and generated restaurant records into a deduplicated SQLite catalog and report on it. 🍣",
    disable_version_flag = true
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./gurume.toml when present).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// SQLite catalog path; overrides `store.path` from the config.
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,
    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    /// Emit log lines as JSON.
    #[clap(long, global = true)]
    pub log_json: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum StrategyArg {
    /// Group similar names and merge each group field by field.
    Cluster,
    /// Drop similar names, then merge exact names.
    Legacy,
}

impl From<StrategyArg> for MergeStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Cluster => MergeStrategy::Cluster,
            StrategyArg::Legacy => MergeStrategy::Legacy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum DimensionArg {
    Location,
    Menu,
}

impl From<DimensionArg> for Dimension {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::Location => Dimension::Location,
            DimensionArg::Menu => Dimension::Menu,
        }
    }
}

impl std::fmt::Display for DimensionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Dimension::from(*self))
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Load JSON files, fold near-duplicates and write canonical records
    Integrate(IntegrateCli),
    /// Write to or inspect the SQLite catalog
    Store(StoreCli),
    /// Aggregate reports over the catalog
    Report(ReportCli),
    /// Print the version
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub(crate) struct DedupArgs {
    /// Names scoring strictly above this similarity are one establishment.
    #[clap(long)]
    pub threshold: Option<f64>,
    /// How duplicates are folded.
    #[clap(long, value_enum)]
    pub strategy: Option<StrategyArg>,
}

#[derive(clap::Args, Debug)]
pub(crate) struct IntegrateCli {
    /// JSON array files, merged in the order given.
    #[clap(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,
    /// Write canonical records here instead of stdout.
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,
    #[clap(flatten)]
    pub dedup: DedupArgs,
}

#[derive(clap::Args, Debug)]
pub(crate) struct StoreCli {
    #[clap(subcommand)]
    pub command: StoreCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum StoreCommand {
    /// Upsert records from JSON files into the catalog
    Load {
        #[clap(required = true, value_name = "FILE")]
        inputs: Vec<PathBuf>,
        /// Fold near-duplicates across all inputs before writing.
        #[clap(long)]
        integrate: bool,
        #[clap(flatten)]
        dedup: DedupArgs,
    },
    /// Print the number of stored restaurants
    Count,
    /// List stored restaurants, best rated first
    List {
        #[clap(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(clap::Args, Debug)]
pub(crate) struct ReportCli {
    #[clap(subcommand)]
    pub command: ReportCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ReportCommand {
    /// Average rating and review count
    Stats,
    /// Restaurant counts per location or menu
    Distribution {
        #[clap(long, value_enum, default_value_t = DimensionArg::Location)]
        by: DimensionArg,
    },
    /// Rating histogram
    Ratings {
        /// Number of equal-width bins over 0-5; overrides `report.rating_bins`.
        #[clap(long)]
        bins: Option<usize>,
    },
    /// Price band distribution
    Prices,
}
