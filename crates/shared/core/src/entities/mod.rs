mod aggregator;
mod auction;
mod bess_node;
mod metrics;
mod price_point;

pub use aggregator::{AggregatorNode, BiddingStrategy};
pub use auction::{Auction, AuctionOutcome, AuctionStatus};
pub use bess_node::{BatteryHealth, BessDefaults, BessNode};
pub use metrics::SystemMetrics;
pub use price_point::PricePoint;
