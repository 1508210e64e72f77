//! CLI argument definitions using clap
//!
//! Commands:
//! - domain-switcher serve --config <path>
//! - domain-switcher check --config <path> --current <domain>
//! - domain-switcher refresh --config <path>
//! - domain-switcher cache --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Domain failover engine with a two-tier candidate list cache
#[derive(Parser, Debug)]
#[command(name = "domain-switcher")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve sessions over WebSocket
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./switcher.json")]
        config: PathBuf,
    },

    /// Run one failover selection and print its progress
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./switcher.json")]
        config: PathBuf,

        /// Domain the client is currently on
        #[arg(long)]
        current: String,
    },

    /// Repopulate the candidate list cache without probing
    Refresh {
        /// Path to configuration file
        #[arg(long, default_value = "./switcher.json")]
        config: PathBuf,
    },

    /// Print the cached candidate list
    Cache {
        /// Path to configuration file
        #[arg(long, default_value = "./switcher.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
