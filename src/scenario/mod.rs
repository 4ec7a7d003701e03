//! Scenario loading and execution

pub mod config;
pub mod runner;

pub use config::{Scenario, Step};
pub use runner::{run_scenario, RunOptions, RunResult};
