//! UI test runner - recorded browser scenarios over CDP
//!
//! This library executes linear UI test scenarios (login, form filling,
//! record management) against a live web application through the Chrome
//! DevTools Protocol.

pub mod browser;
pub mod cli;
pub mod commands;
pub mod common;
pub mod scenario;

// Re-export commonly used types for tests
pub use browser::Selector;
pub use common::{Error, Result};
pub use scenario::{Scenario, Step};
