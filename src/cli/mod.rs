//! CLI module
//!
//! - serve: run the session server
//! - check: one failover selection, printed as JSON lines
//! - refresh: warm the candidate list cache
//! - cache: print the cached candidate list

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build_engine, cache, check, refresh, run_command, serve};
pub use config::SwitcherConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_line, write_response, StdoutNotifier};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
