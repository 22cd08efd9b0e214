//! Payloads carried by each system event, field names as on the wire

use serde::{Deserialize, Serialize};

use crate::values::{AuctionId, DeviceId, Energy, Percent, Price};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionStarted {
    pub auction_id: AuctionId,
    pub total_energy: Energy,
    pub reserve_price: Price,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidPlaced {
    pub auction_id: AuctionId,
    pub aggregator_id: DeviceId,
    pub bess_id: DeviceId,
    pub bid_price: Price,
    pub energy_amount: Energy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidAccepted {
    pub auction_id: AuctionId,
    pub aggregator_id: DeviceId,
    pub bess_id: DeviceId,
    pub final_price: Price,
    pub energy_amount: Energy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRejected {
    pub aggregator_id: DeviceId,
    pub bess_id: DeviceId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionCompleted {
    pub auction_id: AuctionId,
    pub winner_aggregator_id: DeviceId,
    pub seller_bess_id: DeviceId,
    pub energy_sold: Energy,
    pub final_price: Price,
    pub total_value: Price,
    pub auction_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySent {
    pub aggregator_id: DeviceId,
    pub bess_id: DeviceId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub bess_id: DeviceId,
    pub energy_available: Energy,
    pub percentage_for_sale: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyDepleted {
    pub bess_id: DeviceId,
    pub final_energy: Energy,
    pub energy_percentage: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRecharged {
    pub bess_id: DeviceId,
    pub energy_added: Energy,
    pub new_total: Energy,
    pub energy_percentage: Percent,
}

/// BESS status report. Only `device_id` is required; absent fields leave
/// the projected node untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BessNodeStatus {
    pub device_id: DeviceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_available: Option<Energy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_health: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
}

/// Aggregator status report. Older backends omit the counters after
/// `total_bids`, so everything but `device_id` is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorStatus {
    pub device_id: DeviceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bids: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful_bids: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_energy_bought: Option<Energy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_bid_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
}
