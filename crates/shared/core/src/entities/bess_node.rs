use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{DeviceId, Energy, Percent, Price, Timestamp};

/// Battery health class reported by a BESS node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BatteryHealth {
    #[default]
    Excellent,
    Good,
    Fair,
    Poor,
}

impl BatteryHealth {
    /// Map a wire health code (0-3). Codes above 3 are reported as `Poor`.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => BatteryHealth::Excellent,
            1 => BatteryHealth::Good,
            2 => BatteryHealth::Fair,
            _ => BatteryHealth::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryHealth::Excellent => "Excellent",
            BatteryHealth::Good => "Good",
            BatteryHealth::Fair => "Fair",
            BatteryHealth::Poor => "Poor",
        }
    }
}

/// Values used for BESS node fields the backend never transmits
#[derive(Debug, Clone, PartialEq)]
pub struct BessDefaults {
    pub capacity: Energy,
    pub reserve_price: Price,
    pub percentage_for_sale: Percent,
    pub battery_voltage: Decimal,
    pub max_discharge_rate: Energy,
}

impl Default for BessDefaults {
    fn default() -> Self {
        Self {
            capacity: Decimal::ONE_HUNDRED,
            reserve_price: Decimal::new(15, 0),
            percentage_for_sale: Decimal::new(50, 0),
            battery_voltage: Decimal::new(12, 0),
            max_discharge_rate: Decimal::TEN,
        }
    }
}

/// Battery energy storage node, keyed by `device_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BessNode {
    pub device_id: DeviceId,
    pub name: String,
    /// Capacity in kWh, fixed for the node's lifetime
    pub capacity: Energy,
    /// Stored energy in kWh, kept within `0..=capacity`
    pub current_energy_level: Energy,
    pub reserve_price: Price,
    pub percentage_for_sale: Percent,
    pub battery_voltage: Decimal,
    pub max_discharge_rate: Energy,
    pub battery_health: BatteryHealth,
    pub is_online: bool,
    pub last_updated: Timestamp,
}

impl BessNode {
    /// Create a node seen for the first time, filling untransmitted fields from `defaults`
    pub fn synthesize(device_id: DeviceId, defaults: &BessDefaults, at: Timestamp) -> Self {
        Self {
            device_id,
            name: Self::display_name(device_id),
            capacity: defaults.capacity,
            current_energy_level: Decimal::ZERO,
            reserve_price: defaults.reserve_price,
            percentage_for_sale: defaults.percentage_for_sale,
            battery_voltage: defaults.battery_voltage,
            max_discharge_rate: defaults.max_discharge_rate,
            battery_health: BatteryHealth::default(),
            is_online: true,
            last_updated: at,
        }
    }

    /// Display name derived from the device id
    pub fn display_name(device_id: DeviceId) -> String {
        format!("BESS-{}", device_id)
    }

    /// Set the stored energy, clamped to `0..=capacity`
    pub fn set_energy_level(&mut self, level: Energy) {
        self.current_energy_level = level.max(Decimal::ZERO).min(self.capacity);
    }

    /// Set the share offered for sale, clamped to `0..=100`
    pub fn set_percentage_for_sale(&mut self, percentage: Percent) {
        self.percentage_for_sale = percentage.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED);
    }

    /// State of charge as a percentage of capacity
    pub fn energy_percentage(&self) -> Percent {
        if self.capacity.is_zero() {
            return Decimal::ZERO;
        }
        self.current_energy_level
            .checked_div(self.capacity)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }

    /// Energy currently offered for sale
    pub fn available_for_sale(&self) -> Energy {
        let share = self.percentage_for_sale / Decimal::ONE_HUNDRED;
        self.current_energy_level
            .checked_mul(share)
            .unwrap_or(self.current_energy_level)
    }

    /// Energy drawn from the node since it was full
    pub fn sold_energy(&self) -> Energy {
        self.capacity
            .checked_sub(self.current_energy_level)
            .unwrap_or(Decimal::ZERO)
    }
}
