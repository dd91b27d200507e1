//! CLI module
//!
//! Provides command-line interface for:
//! - gather: one collection cycle
//! - run: repeated collection cycles
//! - check: configuration report
//! - sample-config: example configuration

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, gather, gather_to, run, run_command, run_loop, sample_config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_json;
