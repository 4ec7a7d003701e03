//! CLI command handling
//!
//! Dispatches CLI commands and formats output.

use colored::Colorize;

use crate::commands::Commands;
use crate::common::Result;
use crate::scenario::{self, RunOptions};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            path,
            headed,
            verbose,
            timeout,
        } => {
            let options = RunOptions {
                headed,
                verbose,
                action_timeout_secs: timeout,
            };

            let result = scenario::run_scenario(&path, &options).await?;

            if let Some(err) = result.failure() {
                return Err(err);
            }

            Ok(())
        }

        Commands::Check { path } => {
            let scenario = scenario::runner::load_scenario(&path)?;

            println!(
                "{} {} ({} steps)",
                "✓".green(),
                scenario.name.bold(),
                scenario.steps.len()
            );

            Ok(())
        }
    }
}
