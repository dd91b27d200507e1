//! CLI argument definitions using clap
//!
//! Commands:
//! - sqlquery gather --config <path>
//! - sqlquery run --config <path> [--cycles <n>]
//! - sqlquery check --config <path>
//! - sqlquery sample-config

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sqlquery - Turn SQL query results into metric records
#[derive(Parser, Debug)]
#[command(name = "sqlquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one collection cycle and print the records as JSON lines
    Gather {
        /// Path to configuration file
        #[arg(long, default_value = "./sqlquery.json")]
        config: PathBuf,
    },

    /// Run collection cycles every `interval_ms`
    Run {
        /// Path to configuration file
        #[arg(long, default_value = "./sqlquery.json")]
        config: PathBuf,

        /// Stop after this many cycles (runs forever when omitted)
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Print the effective configuration and overlapping column roles
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./sqlquery.json")]
        config: PathBuf,
    },

    /// Print an example configuration file
    SampleConfig,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
