//! wattwatch Projection
//!
//! In-memory state folded from the auction event stream:
//!
//! ```text
//! DecodedEvent ──► ProjectionStore ──► Projection
//!      │                                 ├── auctions       (ring, 10)
//!      │                                 ├── price history  (ring, 100)
//!      │                                 ├── BESS nodes     (by device id)
//!      │                                 ├── aggregators    (by device id)
//!      │                                 └── system metrics (latest)
//!      │
//!      └─────► SharedEventLog ──► LiveEventLog (ring, 100)
//! ```

pub mod config;
pub mod engine;
pub mod event_log;
pub mod ring;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use config::RetentionConfig;
pub use engine::{Projection, Touched};
pub use event_log::{EventFilter, LiveEventLog, LiveEventRecord, SharedEventLog};
pub use ring::BoundedRing;
pub use snapshot::ProjectionSnapshot;
pub use stats::{AuctionStats, DashboardSummary, PriceStats};
pub use store::ProjectionStore;
