//! Configuration for the registration service.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identity store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Verification configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store URL (`memory://`, `file://<path>` or a bare path)
    #[serde(default = "default_store_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// Require a one-time code on verify instead of the bare identifier
    #[serde(default)]
    pub require_code: bool,

    /// How long an issued code stays valid
    #[serde(default = "default_code_ttl", with = "humantime_serde")]
    pub code_ttl: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            require_code: false,
            code_ttl: default_code_ttl(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_store_url() -> String {
    "file://data/identities.json".into()
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

fn default_code_ttl() -> Duration {
    Duration::from_secs(15 * 60)
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
