use std::path::Path;

use serde::{Deserialize, Serialize};
use wattwatch_gateway::{ConfigError, ConnectionConfig};
use wattwatch_projection::RetentionConfig;

/// Environment variable that replaces `connection.url` at startup
pub const URL_ENV_VAR: &str = "WATTWATCH_WS_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    /// How often the binary logs a summary line
    #[serde(default = "default_summary_interval_ms")]
    pub summary_interval_ms: u64,
}

fn default_summary_interval_ms() -> u64 {
    10_000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            retention: RetentionConfig::default(),
            summary_interval_ms: default_summary_interval_ms(),
        }
    }
}

/// Load monitor configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MonitorConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<MonitorConfig, ConfigError> {
    let config: MonitorConfig = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<MonitorConfig, ConfigError> {
    let default_config = include_str!("monitor_config.json");
    load_config_from_str(default_config)
}

impl MonitorConfig {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(URL_ENV_VAR) {
            log::info!("Endpoint overridden by {}: {}", URL_ENV_VAR, url);
            self.connection.url = url;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection.validate()
    }
}
