//! CLI module
//!
//! Command-line interface for bulk record fetches.
//!
//! # Commands
//!
//! - `fetch` - Fetch every matching record with one strategy
//! - `compare` - Run every strategy against the same query and print counts
//! - `validate` - Load and check the client configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, StrategyArg};
pub use runner::Runner;
