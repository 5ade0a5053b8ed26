//! Centralized configuration for the stratus CLI
//!
//! This module provides a single source of truth for all configuration values
//! used throughout the application.
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override defaults:
//! - `STRATUS_API_KEY`: API key used to authenticate requests
//! - `STRATUS_API_URL`: Override the default API URL
//! - `STRATUS_REGION`: Region used when `--region` is not given

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.stratus.cloud";

/// Environment variable name for the API key
pub const API_KEY_ENV_VAR: &str = "STRATUS_API_KEY";

/// Environment variable name for overriding the API URL
pub const API_URL_ENV_VAR: &str = "STRATUS_API_URL";

/// Environment variable name for the default region
pub const REGION_ENV_VAR: &str = "STRATUS_REGION";

/// Default API timeout in seconds
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Delay between two status checks while waiting on a resource
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Object store sizes are allocated in blocks of this many gigabytes
pub const OBJECT_STORE_SIZE_UNIT_GB: u64 = 500;

/// Name of the directory holding the user configuration
const CONFIG_DIR_NAME: &str = ".stratus";

/// Name of the user configuration file
const CONFIG_FILE_NAME: &str = "config.toml";

/// Contents of `~/.stratus/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Default region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl UserConfig {
    /// Directory holding the user configuration
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(CONFIG_DIR_NAME))
    }

    /// Path of the user configuration file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load the user configuration, returning an empty one if the file is absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load a configuration file from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No user configuration found");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse configuration {}", path.display()))
    }
}

/// Values given on the command line, which take precedence over everything else
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// `--region`
    pub region: Option<String>,
    /// `--api-url`
    pub api_url: Option<String>,
}

/// Fully resolved runtime settings
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// API key sent as a bearer token
    pub api_key: String,
    /// API base URL
    pub api_url: String,
    /// Region every request is scoped to, if one was configured
    pub region: Option<String>,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_url", &self.api_url)
            .field("region", &self.region)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// Resolve settings with precedence: overrides, then environment, then file.
    ///
    /// `env` looks up an environment variable by name; empty values count as unset.
    pub fn resolve<F>(file: &UserConfig, overrides: &SettingsOverrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let api_key = lookup(API_KEY_ENV_VAR)
            .or_else(|| file.api_key.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured. Set {API_KEY_ENV_VAR} or add `api_key` to ~/{CONFIG_DIR_NAME}/{CONFIG_FILE_NAME}"
                )
            })?;

        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| lookup(API_URL_ENV_VAR))
            .or_else(|| file.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let region = overrides
            .region
            .clone()
            .or_else(|| lookup(REGION_ENV_VAR))
            .or_else(|| file.region.clone());

        Ok(Self {
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            region,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        })
    }

    /// Settings from the real environment and user configuration file
    pub fn from_environment(overrides: &SettingsOverrides) -> Result<Self> {
        let file = UserConfig::load()?;
        Self::resolve(&file, overrides, |name| std::env::var(name).ok())
    }
}
