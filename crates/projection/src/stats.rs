//! Figures derived from the projection for the dashboard panels

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use wattwatch_core::{Auction, AuctionStatus, Percent, Price, PricePoint};

/// Headline counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardSummary {
    /// Auctions currently retained, not the all-time count
    pub total_auctions: usize,
    pub active_auctions: usize,
    pub total_bids: u64,
    pub bess_nodes: usize,
    pub online_bess_nodes: usize,
    pub aggregators: usize,
    pub online_aggregators: usize,
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "auctions {} ({} active), bids {}, bess {}/{} online, aggregators {}/{} online",
            self.total_auctions,
            self.active_auctions,
            self.total_bids,
            self.online_bess_nodes,
            self.bess_nodes,
            self.online_aggregators,
            self.aggregators
        )
    }
}

/// Price spread over the retained price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceStats {
    pub average: Price,
    pub min: Price,
    pub max: Price,
    pub range: Price,
}

impl PriceStats {
    /// `None` for an empty history
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a PricePoint>) -> Option<Self> {
        let prices: Vec<Price> = points.into_iter().map(|point| point.price).collect();
        let min = prices.iter().copied().min()?;
        let max = prices.iter().copied().max()?;

        Some(Self {
            average: mean(&prices)?,
            min,
            max,
            range: max.checked_sub(min).unwrap_or(Decimal::MAX),
        })
    }
}

/// Arithmetic mean that stays within `Decimal` range when the plain sum
/// would overflow
fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let count = Decimal::from(values.len());
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value));
    match sum {
        Some(sum) => sum.checked_div(count),
        // Each share is at most MAX / count, so the partial sums stay bounded
        None => values
            .iter()
            .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value.checked_div(count)?)),
    }
}

/// Bid activity over the retained auctions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AuctionStats {
    pub total_bids: u64,
    pub avg_bids_per_auction: Decimal,
    /// Mean improvement over reserve across completed auctions
    pub avg_price_improvement_percent: Option<Percent>,
}

impl AuctionStats {
    pub fn from_auctions<'a>(auctions: impl IntoIterator<Item = &'a Auction>) -> Self {
        let mut count = 0usize;
        let mut total_bids = 0u64;
        let mut improvements = Vec::new();

        for auction in auctions {
            count += 1;
            total_bids = total_bids.saturating_add(auction.total_bids);
            if auction.status == AuctionStatus::Completed {
                if let Some(improvement) = auction.price_improvement_percent() {
                    improvements.push(improvement);
                }
            }
        }

        let avg_bids_per_auction = Decimal::from(total_bids)
            .checked_div(Decimal::from(count))
            .unwrap_or(Decimal::ZERO);
        let avg_price_improvement_percent = mean(&improvements);

        Self {
            total_bids,
            avg_bids_per_auction,
            avg_price_improvement_percent,
        }
    }
}
