use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{DeviceId, Energy, Percent, Price, Timestamp};

/// Bidding strategy followed by an aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BiddingStrategy {
    #[default]
    Random,
    Conservative,
    Aggressive,
    Intelligent,
}

impl BiddingStrategy {
    /// Parse a strategy name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => Some(BiddingStrategy::Random),
            "conservative" => Some(BiddingStrategy::Conservative),
            "aggressive" => Some(BiddingStrategy::Aggressive),
            "intelligent" => Some(BiddingStrategy::Intelligent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BiddingStrategy::Random => "Random",
            BiddingStrategy::Conservative => "Conservative",
            BiddingStrategy::Aggressive => "Aggressive",
            BiddingStrategy::Intelligent => "Intelligent",
        }
    }
}

/// Automated bidding agent, keyed by `device_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorNode {
    pub device_id: DeviceId,
    pub name: String,
    pub strategy: BiddingStrategy,
    pub is_online: bool,
    /// Share of successful bids, as a percentage in `0..=100`
    pub success_rate: Percent,
    pub total_bids: u64,
    pub successful_bids: u64,
    pub total_energy_bought: Energy,
    pub average_bid_price: Price,
    pub last_updated: Timestamp,
}

impl AggregatorNode {
    /// Create an aggregator seen for the first time
    pub fn synthesize(device_id: DeviceId, at: Timestamp) -> Self {
        Self {
            device_id,
            name: Self::display_name(device_id),
            strategy: BiddingStrategy::default(),
            is_online: true,
            success_rate: Decimal::ZERO,
            total_bids: 0,
            successful_bids: 0,
            total_energy_bought: Decimal::ZERO,
            average_bid_price: Decimal::ZERO,
            last_updated: at,
        }
    }

    /// Display name derived from the device id
    pub fn display_name(device_id: DeviceId) -> String {
        format!("Aggregator-{}", device_id)
    }

    /// Set the success rate, clamped to `0..=100`
    pub fn set_success_rate(&mut self, rate: Percent) {
        self.success_rate = rate.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strategy_names() {
        assert_eq!(
            BiddingStrategy::from_name("Intelligent"),
            Some(BiddingStrategy::Intelligent)
        );
        assert_eq!(
            BiddingStrategy::from_name("aggressive"),
            Some(BiddingStrategy::Aggressive)
        );
        assert_eq!(BiddingStrategy::from_name("greedy"), None);
        assert_eq!(BiddingStrategy::Conservative.as_str(), "Conservative");
    }

    #[test]
    fn test_success_rate_is_clamped() {
        let mut agg = AggregatorNode::synthesize(201, Utc::now());
        assert_eq!(agg.name, "Aggregator-201");

        agg.set_success_rate(dec!(140));
        assert_eq!(agg.success_rate, dec!(100));
        agg.set_success_rate(dec!(72.5));
        assert_eq!(agg.success_rate, dec!(72.5));
    }
}
