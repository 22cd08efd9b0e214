use serde::{Deserialize, Serialize};

use crate::values::{DeviceId, Energy, Price, Timestamp};

/// One accepted bid in the price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: Timestamp,
    pub price: Price,
    pub energy_amount: Energy,
    pub aggregator_id: DeviceId,
    pub bess_id: DeviceId,
}
