//! wattwatch core domain
//!
//! Pure domain types for the auction monitor: the entities the projection
//! keeps (auctions, BESS nodes, aggregators, price history) and the typed
//! system events the backend streams.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod events;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AggregatorNode, Auction, AuctionOutcome, AuctionStatus, BatteryHealth, BessDefaults,
    BessNode, BiddingStrategy, PricePoint, SystemMetrics,
};
pub use events::{DecodedEvent, EventKind, SystemEvent};
pub use values::{AuctionId, DeviceId, Energy, Percent, Price, Timestamp};
