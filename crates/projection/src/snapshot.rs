use serde::Serialize;
use wattwatch_core::{AggregatorNode, Auction, BessNode, PricePoint, SystemMetrics, Timestamp};

use crate::stats::{AuctionStats, DashboardSummary, PriceStats};

/// Point-in-time copy of the projection for the presentation side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSnapshot {
    pub taken_at: Timestamp,
    /// Oldest first
    pub auctions: Vec<Auction>,
    /// Arrival order
    pub price_history: Vec<PricePoint>,
    /// Ordered by device id
    pub bess_nodes: Vec<BessNode>,
    /// Ordered by device id
    pub aggregators: Vec<AggregatorNode>,
    pub system_metrics: Option<SystemMetrics>,
    pub summary: DashboardSummary,
    pub price_stats: Option<PriceStats>,
    pub auction_stats: AuctionStats,
}

impl ProjectionSnapshot {
    pub fn active_auctions(&self) -> impl Iterator<Item = &Auction> {
        self.auctions.iter().filter(|a| a.is_active())
    }

    pub fn latest_auction(&self) -> Option<&Auction> {
        self.auctions.last()
    }

    /// True when nothing has been projected yet
    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
            && self.price_history.is_empty()
            && self.bess_nodes.is_empty()
            && self.aggregators.is_empty()
            && self.system_metrics.is_none()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use wattwatch_core::SystemEvent;
    use wattwatch_core::events::{AuctionStarted, BidAccepted};

    use crate::{Projection, RetentionConfig};

    fn started(id: u64) -> SystemEvent {
        SystemEvent::AuctionStarted(AuctionStarted {
            auction_id: id,
            total_energy: dec!(100),
            reserve_price: dec!(15),
        })
    }

    #[test]
    fn test_empty_snapshot() {
        let at = Utc.timestamp_opt(0, 0).unwrap();
        let snapshot = Projection::new(&RetentionConfig::default()).snapshot(at);
        assert!(snapshot.is_empty());
        assert!(snapshot.latest_auction().is_none());
        assert_eq!(snapshot.active_auctions().count(), 0);
    }

    #[test]
    fn test_latest_and_active_auctions() {
        let at = Utc.timestamp_opt(0, 0).unwrap();
        let mut projection = Projection::new(&RetentionConfig::default());
        for id in [4, 9, 2] {
            projection.apply(&started(id), at);
        }
        projection.apply(
            &SystemEvent::BidAccepted(BidAccepted {
                auction_id: 9,
                aggregator_id: 100,
                bess_id: 1,
                final_price: dec!(16),
                energy_amount: dec!(10),
            }),
            at,
        );

        let snapshot = projection.snapshot(at);
        assert!(!snapshot.is_empty());
        // Arrival order, not id order
        assert_eq!(snapshot.latest_auction().map(|a| a.id), Some(2));
        let active: Vec<_> = snapshot.active_auctions().map(|a| a.id).collect();
        assert_eq!(active, vec![4, 2]);
    }
}
