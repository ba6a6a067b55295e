//! CLI commands and argument parsing

use crate::pagination::StrategyKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bulk record fetcher CLI
#[derive(Parser, Debug)]
#[command(name = "bulk-records")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter from `RUST_LOG`, falling back to info (debug with `--verbose`)
    pub fn log_filter(&self) -> EnvFilter {
        log_filter(self.verbose, std::env::var("RUST_LOG").ok().as_deref())
    }
}

fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every matching record
    Fetch {
        /// Pagination strategy
        #[arg(short, long, default_value = "id")]
        strategy: StrategyArg,

        /// App to read from (defaults to the configured app)
        #[arg(short, long)]
        app: Option<String>,

        /// Filter condition in the platform query language
        #[arg(long)]
        filter: Option<String>,

        /// Sort key such as "updated_time desc" (repeatable)
        #[arg(long)]
        sort: Vec<String>,

        /// Fields to return (comma-separated)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Maximum records (offset strategy only)
        #[arg(long)]
        limit: Option<u64>,

        /// Records to skip (offset strategy only)
        #[arg(long)]
        offset: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Fetch with every strategy and print one count per strategy
    Compare {
        /// App to read from (defaults to the configured app)
        #[arg(short, long)]
        app: Option<String>,

        /// Filter condition in the platform query language
        #[arg(long)]
        filter: Option<String>,
    },

    /// Validate the client configuration
    Validate,
}

/// Strategy names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyArg {
    /// `$id` threshold pagination
    Id,
    /// Server-side cursor
    Cursor,
    /// Offset/limit pagination
    Offset,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Id => StrategyKind::IdThreshold,
            StrategyArg::Cursor => StrategyKind::Cursor,
            StrategyArg::Offset => StrategyKind::Offset,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON record per line
    Json,
    /// Pretty-printed JSON array
    Pretty,
    /// Only the number of records
    Count,
}
