//! Command implementations

/// Firewall and firewall rule commands
pub mod firewall;
/// Object store commands
pub mod objectstore;
