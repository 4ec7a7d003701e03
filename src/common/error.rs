//! Error types for the UI test runner
//!
//! Every step error is fatal to the scenario: nothing is retried or
//! recovered locally, and the failing step surfaces to the process exit
//! status.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the UI test runner
#[derive(Error, Debug)]
pub enum Error {
    // === Browser/Launch Errors ===
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser error: {0}")]
    Browser(String),

    // === Selector Errors ===
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("No element matching '{selector}' after waiting {waited_secs}s")]
    ElementNotFound { selector: String, waited_secs: u64 },

    #[error("Selector '{selector}' matches {count} elements, expected exactly one")]
    AmbiguousSelector { selector: String, count: usize },

    // === Action Errors ===
    #[error("Element matching '{selector}' is not an editable field")]
    EditableTargetRequired { selector: String },

    #[error("Select matching '{selector}' has no option with value '{value}'")]
    OptionValueNotFound { selector: String, value: String },

    // === Navigation/Assertion Errors ===
    #[error("Navigation did not complete within {0}s")]
    NavigationTimeout(u64),

    #[error("URL assertion failed: expected '{expected}', got '{actual}'")]
    UrlAssertionMismatch { expected: String, actual: String },

    // === Scenario Errors ===
    #[error("Scenario '{name}' failed at step {step}: {message}")]
    ScenarioFailed {
        name: String,
        step: usize,
        message: String,
    },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an element-not-found error recording how long the runner
    /// polled for the selector before giving up
    pub fn element_not_found(selector: &str, waited_secs: u64) -> Self {
        Self::ElementNotFound {
            selector: selector.to_string(),
            waited_secs,
        }
    }

    /// Create an ambiguous-selector error
    pub fn ambiguous_selector(selector: &str, count: usize) -> Self {
        Self::AmbiguousSelector {
            selector: selector.to_string(),
            count,
        }
    }

    /// Create a URL assertion mismatch error
    pub fn url_mismatch(expected: &str, actual: &str) -> Self {
        Self::UrlAssertionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        Error::Browser(e.to_string())
    }
}
