use serde::{Deserialize, Serialize};

use crate::values::Percent;

/// System-wide counters published by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub total_auctions: u64,
    pub total_bids: u64,
    pub avg_price_improvement_percent: Percent,
    pub active_bess_nodes: u64,
    pub active_aggregators: u64,
}
