//! Shared terminal utilities for the stratus CLI
//!
//! User interface implementations, result rendering and small formatting
//! helpers used by every command.

/// Result rendering (human, JSON, custom fields)
pub mod output;
/// Elapsed time formatting
pub mod time;
/// Spinner and prompt implementations
pub mod ui;

pub use output::{OutputError, OutputWriter, Renderer};
pub use time::format_elapsed;
pub use ui::{RealUserInterface, SpinnerLog, TestUserInterface, styled};
