//! Connection configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_URL: &str = "ws://localhost:8080/ws";
pub const DEFAULT_RECONNECT_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Where the backend lives and how hard to try to reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_reconnect_interval_ms() -> u64 {
    DEFAULT_RECONNECT_INTERVAL_MS
}

fn default_max_reconnect_attempts() -> u32 {
    DEFAULT_MAX_RECONNECT_ATTEMPTS
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

impl ConnectionConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_reconnect_interval_ms(mut self, ms: u64) -> Self {
        self.reconnect_interval_ms = ms;
        self
    }

    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    pub fn policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            interval: Duration::from_millis(self.reconnect_interval_ms),
            max_attempts: self.max_reconnect_attempts,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(&self.url)?;
        if self.reconnect_interval_ms == 0 {
            return Err(ConfigError::ZeroReconnectInterval);
        }
        Ok(())
    }
}

/// Parse `url` and require a `ws` or `wss` scheme
pub fn validate_endpoint(url: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidEndpoint {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "ws" | "wss" => Ok(parsed),
        other => Err(ConfigError::InvalidEndpoint {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Fixed-interval retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay before every retry, not grown between attempts
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ConnectionConfig::default().policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: ConnectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConnectionConfig::default());
        assert_eq!(config.url, "ws://localhost:8080/ws");

        let policy = config.policy();
        assert_eq!(policy.interval, Duration::from_millis(3000));
        assert_eq!(policy.max_attempts, 5);
    }

    #[test]
    fn test_partial_override() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"max_reconnect_attempts": 2}"#).unwrap();
        assert_eq!(config.max_reconnect_attempts, 2);
        assert_eq!(config.reconnect_interval_ms, 3000);
    }

    #[test]
    fn test_validate_accepts_ws_and_wss() {
        assert!(ConnectionConfig::new("ws://10.0.0.5:9000/ws").validate().is_ok());
        assert!(ConnectionConfig::new("wss://auction.example/ws").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_other_schemes() {
        let err = ConnectionConfig::new("http://localhost:8080/ws")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
        assert!(err.to_string().contains("unsupported scheme 'http'"));

        assert!(ConnectionConfig::new("not a url").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = ConnectionConfig::default().with_reconnect_interval_ms(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroReconnectInterval)
        ));
    }
}
