//! UI test runner - recorded browser scenarios over CDP
//!
//! This CLI tool replays recorded UI test scenarios against a live web
//! application and reports pass/fail through its exit status.

use clap::Parser;
use uitest::{cli, commands::Commands, common::logging};

#[derive(Parser)]
#[command(name = "uitest", about = "Browser UI scenario runner")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
