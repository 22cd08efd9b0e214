use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price in cents per kWh
pub type Price = Decimal;

/// Energy amount in kWh
pub type Energy = Decimal;

/// Percentage value, nominally 0..=100
pub type Percent = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Identifier of a BESS node or aggregator, assigned by the backend
pub type DeviceId = u64;

/// Identifier of an auction, assigned by the backend
pub type AuctionId = u64;
