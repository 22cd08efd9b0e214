//! Retention bounds

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_max_auctions")]
    pub max_auctions: usize,
    #[serde(default = "default_max_price_points")]
    pub max_price_points: usize,
    #[serde(default = "default_max_live_events")]
    pub max_live_events: usize,
}

fn default_max_auctions() -> usize {
    10
}

fn default_max_price_points() -> usize {
    100
}

fn default_max_live_events() -> usize {
    100
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_auctions: default_max_auctions(),
            max_price_points: default_max_price_points(),
            max_live_events: default_max_live_events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: RetentionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RetentionConfig::default());
        assert_eq!(config.max_auctions, 10);
        assert_eq!(config.max_price_points, 100);
        assert_eq!(config.max_live_events, 100);
    }
}
