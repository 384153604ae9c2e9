//! Configuration for the profile intake API.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Profile store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Profile rules
    #[serde(default)]
    pub profiles: ProfilesConfig,

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

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilesConfig {
    /// Reject a profile whose email is already on file
    #[serde(default)]
    pub unique_email: bool,
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

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_store_url() -> String {
    "file://data/profiles.json".into()
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5001
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();

        assert_eq!(config.server.port, 5001);
        assert_eq!(config.store.url, "file://data/profiles.json");
        assert!(!config.profiles.unique_email);
        assert_eq!(config.log.level, "info");
    }
}
