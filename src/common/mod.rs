//! Common utilities shared across the CLI and the scenario runner

pub mod error;
pub mod logging;

pub use error::{Error, Result};
