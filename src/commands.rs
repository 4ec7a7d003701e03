//! CLI command definitions
//!
//! Defines the clap commands for the UI test runner.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario against a live application
    Run {
        /// Path to the YAML scenario file
        path: PathBuf,

        /// Launch a visible browser window instead of headless
        #[arg(long)]
        headed: bool,

        /// Print the page URL after every step
        #[arg(long, short)]
        verbose: bool,

        /// Seconds to wait for a selector to become resolvable
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Validate a scenario file without launching a browser
    Check {
        /// Path to the YAML scenario file
        path: PathBuf,
    },
}
