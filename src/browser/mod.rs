//! Browser automation layer
//!
//! Wraps chromiumoxide behind the handful of page operations the scenario
//! runner needs, with strict single-match selector resolution.

pub mod selector;
pub mod session;

pub use selector::Selector;
pub use session::{Session, SessionConfig};
