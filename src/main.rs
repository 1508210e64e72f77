//! domain-switcher entry point
//!
//! Parses arguments, runs the command, prints any error to stderr and
//! exits non-zero on failure. Everything else lives in the CLI module.

use domain_switcher::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
