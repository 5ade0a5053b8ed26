//! Core functionality for the stratus CLI
//!
//! This crate contains the foundational types and functionality used across
//! the stratus CLI application, including configuration management, the API
//! client, and dependency injection interfaces.

/// API client module for interacting with the provider API
pub mod api_client;
/// Configuration constants and types
pub mod config;
/// Dependency injection traits and implementations
pub mod deps;
/// API error types
pub mod error;
/// Lookup of resources by ID or name
pub mod find;

// Re-export commonly used types at the crate root
pub use config::{
    API_KEY_ENV_VAR, API_URL_ENV_VAR, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS,
    DEFAULT_POLL_INTERVAL_SECS, OBJECT_STORE_SIZE_UNIT_GB, REGION_ENV_VAR, Settings,
    SettingsOverrides, UserConfig,
};
pub use deps::{
    AsyncRuntime, Clock, CloudApiClient, MessageStyle, ProgressIndicator, RealAsyncRuntime,
    RealClock, RealCloudApiClient, UserInterface,
};
pub use error::ApiError;
