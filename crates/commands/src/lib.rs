//! Command implementations for the stratus CLI
//!
//! Each command validates its flags, calls the provider API through the
//! injected client, optionally waits for the resource to settle and renders
//! the result.

/// Command implementations module
pub mod commands;
/// Per-invocation global flags
pub mod context;
/// Flag validation
pub mod validation;
/// Polling a resource until it reaches a terminal status
pub mod wait;

#[cfg(test)]
pub mod test_helpers;

pub use commands::{firewall, objectstore};
pub use context::CommandContext;
pub use validation::ValidationError;
pub use wait::{StatusResource, WaitError, WaitOptions, WaitRequest, wait_for};
