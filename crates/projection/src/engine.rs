//! State projection engine
//!
//! Folds the decoded event stream into the collections the dashboard reads.
//! `apply` is total over every event kind: unknown foreign ids are no-ops,
//! never errors, since the stream is not guaranteed gap-free.

use std::collections::BTreeMap;

use wattwatch_core::events::{AggregatorStatus, BessNodeStatus};
use wattwatch_core::{
    AggregatorNode, Auction, AuctionId, AuctionOutcome, BatteryHealth, BessDefaults, BessNode,
    BiddingStrategy, DeviceId, PricePoint, SystemEvent, SystemMetrics, Timestamp,
};

use crate::config::RetentionConfig;
use crate::ring::BoundedRing;
use crate::snapshot::ProjectionSnapshot;
use crate::stats::{AuctionStats, DashboardSummary, PriceStats};

/// Which collection an applied event changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Touched {
    Nothing,
    Auction(AuctionId),
    PriceHistory,
    /// A bid for a retained auction: the auction and the price history
    AuctionAndPriceHistory(AuctionId),
    BessNode(DeviceId),
    Aggregator(DeviceId),
    SystemMetrics,
}

impl Touched {
    pub fn changed(&self) -> bool {
        !matches!(self, Touched::Nothing)
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    auctions: BoundedRing<Auction>,
    price_history: BoundedRing<PricePoint>,
    bess_nodes: BTreeMap<DeviceId, BessNode>,
    aggregators: BTreeMap<DeviceId, AggregatorNode>,
    system_metrics: Option<SystemMetrics>,
    bess_defaults: BessDefaults,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(&RetentionConfig::default())
    }
}

impl Projection {
    pub fn new(retention: &RetentionConfig) -> Self {
        Self {
            auctions: BoundedRing::new(retention.max_auctions),
            price_history: BoundedRing::new(retention.max_price_points),
            bess_nodes: BTreeMap::new(),
            aggregators: BTreeMap::new(),
            system_metrics: None,
            bess_defaults: BessDefaults::default(),
        }
    }

    /// Override the values used for BESS fields the backend never sends
    pub fn with_bess_defaults(mut self, defaults: BessDefaults) -> Self {
        self.bess_defaults = defaults;
        self
    }

    pub fn apply(&mut self, event: &SystemEvent, at: Timestamp) -> Touched {
        let touched = match event {
            SystemEvent::AuctionStarted(e) => {
                if self.auction(e.auction_id).is_some() {
                    log::debug!("Auction {} already tracked, start ignored", e.auction_id);
                    return Touched::Nothing;
                }
                let auction = Auction::started(e.auction_id, e.total_energy, e.reserve_price, at);
                if let Some(evicted) = self.auctions.push(auction) {
                    log::trace!("Auction {} evicted", evicted.id);
                }
                Touched::Auction(e.auction_id)
            }

            SystemEvent::BidPlaced(e) => {
                let known = match self.auction_mut(e.auction_id) {
                    Some(auction) => {
                        auction.record_bid(e.bid_price);
                        true
                    }
                    None => false,
                };
                self.price_history.push(PricePoint {
                    timestamp: at,
                    price: e.bid_price,
                    energy_amount: e.energy_amount,
                    aggregator_id: e.aggregator_id,
                    bess_id: e.bess_id,
                });
                if known {
                    Touched::AuctionAndPriceHistory(e.auction_id)
                } else {
                    log::debug!("Bid for unknown auction {}", e.auction_id);
                    Touched::PriceHistory
                }
            }

            SystemEvent::BidAccepted(e) => {
                let completed = self
                    .auction_mut(e.auction_id)
                    .is_some_and(|auction| auction.mark_completed());
                if completed {
                    Touched::Auction(e.auction_id)
                } else {
                    Touched::Nothing
                }
            }

            SystemEvent::AuctionCompleted(e) => {
                let outcome = AuctionOutcome {
                    winner_aggregator_id: e.winner_aggregator_id,
                    seller_bess_id: e.seller_bess_id,
                    energy_sold: e.energy_sold,
                    final_price: e.final_price,
                    total_value: e.total_value,
                    duration_ms: e.auction_duration_ms,
                };
                let completed = self
                    .auction_mut(e.auction_id)
                    .is_some_and(|auction| auction.complete_with(outcome));
                if completed {
                    Touched::Auction(e.auction_id)
                } else {
                    Touched::Nothing
                }
            }

            SystemEvent::BidRejected(_) | SystemEvent::QuerySent(_) => Touched::Nothing,

            SystemEvent::QueryResponse(e) => match self.bess_nodes.get_mut(&e.bess_id) {
                Some(node) => {
                    node.set_energy_level(e.energy_available);
                    node.set_percentage_for_sale(e.percentage_for_sale);
                    node.last_updated = at;
                    Touched::BessNode(e.bess_id)
                }
                None => Touched::Nothing,
            },

            SystemEvent::EnergyDepleted(e) => match self.bess_nodes.get_mut(&e.bess_id) {
                Some(node) => {
                    node.set_energy_level(e.final_energy);
                    node.last_updated = at;
                    Touched::BessNode(e.bess_id)
                }
                None => Touched::Nothing,
            },

            SystemEvent::EnergyRecharged(e) => match self.bess_nodes.get_mut(&e.bess_id) {
                Some(node) => {
                    node.set_energy_level(e.new_total);
                    node.last_updated = at;
                    Touched::BessNode(e.bess_id)
                }
                None => Touched::Nothing,
            },

            SystemEvent::BessNodeStatus(status) => {
                self.upsert_bess(status, at);
                Touched::BessNode(status.device_id)
            }

            SystemEvent::AggregatorStatus(status) => {
                self.upsert_aggregator(status, at);
                Touched::Aggregator(status.device_id)
            }

            SystemEvent::SystemMetrics(metrics) => {
                self.system_metrics = Some(metrics.clone());
                Touched::SystemMetrics
            }
        };

        log::trace!("Applied {} -> {:?}", event.kind(), touched);
        touched
    }

    fn upsert_bess(&mut self, status: &BessNodeStatus, at: Timestamp) {
        let defaults = &self.bess_defaults;
        let node = self
            .bess_nodes
            .entry(status.device_id)
            .or_insert_with(|| BessNode::synthesize(status.device_id, defaults, at));

        if let Some(energy) = status.energy_available {
            node.set_energy_level(energy);
        }
        if let Some(code) = status.battery_health {
            node.battery_health = BatteryHealth::from_code(code);
        }
        if let Some(online) = status.is_online {
            node.is_online = online;
        }
        node.last_updated = at;
    }

    fn upsert_aggregator(&mut self, status: &AggregatorStatus, at: Timestamp) {
        let node = self
            .aggregators
            .entry(status.device_id)
            .or_insert_with(|| AggregatorNode::synthesize(status.device_id, at));

        if let Some(name) = status.strategy.as_deref() {
            match BiddingStrategy::from_name(name) {
                Some(strategy) => node.strategy = strategy,
                None => log::debug!("Unknown strategy '{}' for aggregator {}", name, node.device_id),
            }
        }
        if let Some(rate) = status.success_rate {
            node.set_success_rate(rate);
        }
        if let Some(total) = status.total_bids {
            node.total_bids = total;
        }
        if let Some(successful) = status.successful_bids {
            node.successful_bids = successful;
        }
        if let Some(bought) = status.total_energy_bought {
            node.total_energy_bought = bought;
        }
        if let Some(price) = status.average_bid_price {
            node.average_bid_price = price;
        }
        if let Some(online) = status.is_online {
            node.is_online = online;
        }
        node.last_updated = at;
    }

    fn auction_mut(&mut self, id: AuctionId) -> Option<&mut Auction> {
        self.auctions.find_mut(|a| a.id == id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Retained auctions, oldest first
    pub fn auctions(&self) -> impl Iterator<Item = &Auction> {
        self.auctions.iter()
    }

    /// Retained auctions, newest first
    pub fn latest_auctions(&self) -> impl Iterator<Item = &Auction> {
        self.auctions.newest_first()
    }

    pub fn auction(&self, id: AuctionId) -> Option<&Auction> {
        self.auctions.find(|a| a.id == id)
    }

    pub fn auction_count(&self) -> usize {
        self.auctions.len()
    }

    /// BESS nodes ordered by device id
    pub fn bess_nodes(&self) -> impl Iterator<Item = &BessNode> {
        self.bess_nodes.values()
    }

    pub fn bess_node(&self, device_id: DeviceId) -> Option<&BessNode> {
        self.bess_nodes.get(&device_id)
    }

    /// Aggregators ordered by device id
    pub fn aggregators(&self) -> impl Iterator<Item = &AggregatorNode> {
        self.aggregators.values()
    }

    pub fn aggregator(&self, device_id: DeviceId) -> Option<&AggregatorNode> {
        self.aggregators.get(&device_id)
    }

    /// Retained price points in arrival order
    pub fn price_history(&self) -> impl Iterator<Item = &PricePoint> {
        self.price_history.iter()
    }

    pub fn price_point_count(&self) -> usize {
        self.price_history.len()
    }

    pub fn system_metrics(&self) -> Option<&SystemMetrics> {
        self.system_metrics.as_ref()
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            total_auctions: self.auctions.len(),
            active_auctions: self.auctions.iter().filter(|a| a.is_active()).count(),
            total_bids: self.auctions.iter().map(|a| a.total_bids).sum(),
            bess_nodes: self.bess_nodes.len(),
            online_bess_nodes: self.bess_nodes.values().filter(|n| n.is_online).count(),
            aggregators: self.aggregators.len(),
            online_aggregators: self.aggregators.values().filter(|n| n.is_online).count(),
        }
    }

    pub fn price_stats(&self) -> Option<PriceStats> {
        PriceStats::from_points(&self.price_history)
    }

    pub fn auction_stats(&self) -> AuctionStats {
        AuctionStats::from_auctions(&self.auctions)
    }

    pub fn snapshot(&self, taken_at: Timestamp) -> ProjectionSnapshot {
        ProjectionSnapshot {
            taken_at,
            auctions: self.auctions.iter().cloned().collect(),
            price_history: self.price_history.iter().cloned().collect(),
            bess_nodes: self.bess_nodes.values().cloned().collect(),
            aggregators: self.aggregators.values().cloned().collect(),
            system_metrics: self.system_metrics.clone(),
            summary: self.summary(),
            price_stats: self.price_stats(),
            auction_stats: self.auction_stats(),
        }
    }
}
