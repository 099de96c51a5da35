//! Configuration management for the Converge CLI
//!
//! Settings are resolved in layers, later layers winning:
//! 1. Built-in defaults
//! 2. Config file (`~/.config/converge/config.toml`)
//! 3. Environment variables (`CONVERGE_*`)
//! 4. Command-line overrides

use config::{Config as ConfigSource, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConvergeError, Result};

/// Default platform endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.converge.dev";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Platform API endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Whether to verify TLS certificates
    pub verify_tls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_tls: true,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Whether progress bars are drawn
    pub progress: bool,
    /// Whether color output is allowed
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            progress: true,
            color: true,
        }
    }
}

/// Top-level CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Override for the session file location
    #[serde(default)]
    pub session_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from defaults, an optional explicit config file,
    /// and the environment
    pub fn load_from(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigSource::builder()
            .set_default("client.endpoint", DEFAULT_ENDPOINT)?
            .set_default("client.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("client.verify_tls", true)?
            .set_default("ui.progress", true)?
            .set_default("ui.color", true)?;

        match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path));
            }
            None => {
                if let Some(path) = Self::default_config_file() {
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        // CONVERGE_CLIENT__ENDPOINT, CONVERGE_UI__PROGRESS, ...
        // The prefix separator must stay "_"; otherwise the nesting
        // separator would silently apply to the prefix as well.
        builder = builder.add_source(
            Environment::with_prefix("CONVERGE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate resolved settings
    pub fn validate(&self) -> Result<()> {
        if self.client.endpoint.is_empty() {
            return Err(ConvergeError::invalid_endpoint("endpoint must not be empty"));
        }
        if !self.client.endpoint.starts_with("http://")
            && !self.client.endpoint.starts_with("https://")
        {
            return Err(ConvergeError::invalid_endpoint(format!(
                "endpoint must start with http:// or https://: {}",
                self.client.endpoint
            )));
        }
        if self.client.timeout_secs == 0 {
            return Err(ConvergeError::config("timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    /// Apply a command-line endpoint override
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.client.endpoint = endpoint;
        }
        self
    }

    /// Directory for config and session files
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("converge"))
    }

    /// Default config file location
    pub fn default_config_file() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Resolved session file location
    pub fn session_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.session_path {
            return Ok(path.clone());
        }
        Self::config_dir()
            .map(|d| d.join("session.json"))
            .ok_or_else(|| ConvergeError::config("could not determine config directory"))
    }
}
