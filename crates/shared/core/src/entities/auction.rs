use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{AuctionId, DeviceId, Energy, Percent, Price, Timestamp};

/// Auction lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    /// Accepting bids
    Active,
    /// A bid was accepted
    Completed,
    /// Withdrawn without a sale (defined, not driven by any current event)
    Cancelled,
}

impl AuctionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, AuctionStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Active => "active",
            AuctionStatus::Completed => "completed",
            AuctionStatus::Cancelled => "cancelled",
        }
    }
}

/// Settlement details, present only once an auction-completed event arrived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionOutcome {
    pub winner_aggregator_id: DeviceId,
    pub seller_bess_id: DeviceId,
    pub energy_sold: Energy,
    pub final_price: Price,
    pub total_value: Decimal,
    pub duration_ms: u64,
}

/// Energy auction as seen from the event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    /// Arrival time of the auction-started event
    pub start_time: Timestamp,
    pub total_energy: Energy,
    pub reserve_price: Price,
    pub current_highest_bid: Price,
    pub current_lowest_bid: Price,
    pub total_bids: u64,
    pub status: AuctionStatus,
    pub outcome: Option<AuctionOutcome>,
}

impl Auction {
    /// A freshly started auction; both running bids start at the reserve price
    pub fn started(
        id: AuctionId,
        total_energy: Energy,
        reserve_price: Price,
        start_time: Timestamp,
    ) -> Self {
        Self {
            id,
            start_time,
            total_energy,
            reserve_price,
            current_highest_bid: reserve_price,
            current_lowest_bid: reserve_price,
            total_bids: 0,
            status: AuctionStatus::Active,
            outcome: None,
        }
    }

    /// Fold one bid into the running highest/lowest and the bid count
    pub fn record_bid(&mut self, bid_price: Price) {
        self.current_highest_bid = self.current_highest_bid.max(bid_price);
        self.current_lowest_bid = self.current_lowest_bid.min(bid_price);
        self.total_bids += 1;
    }

    /// Mark the auction completed. Returns false for a cancelled auction.
    pub fn mark_completed(&mut self) -> bool {
        if self.status == AuctionStatus::Cancelled {
            return false;
        }
        self.status = AuctionStatus::Completed;
        true
    }

    /// Mark completed and record settlement details (last writer wins)
    pub fn complete_with(&mut self, outcome: AuctionOutcome) -> bool {
        if !self.mark_completed() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// How far the highest bid rose above the reserve, in percent
    pub fn price_improvement_percent(&self) -> Option<Percent> {
        if self.reserve_price.is_zero() {
            return None;
        }
        self.current_highest_bid
            .checked_sub(self.reserve_price)?
            .checked_div(self.reserve_price)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_started_auction() {
        let auction = Auction::started(1, dec!(100), dec!(15), Utc::now());
        assert!(auction.is_active());
        assert_eq!(auction.current_highest_bid, dec!(15));
        assert_eq!(auction.current_lowest_bid, dec!(15));
        assert_eq!(auction.total_bids, 0);
        assert!(auction.outcome.is_none());
    }

    #[test]
    fn test_record_bid() {
        let mut auction = Auction::started(1, dec!(100), dec!(15), Utc::now());
        auction.record_bid(dec!(16));
        auction.record_bid(dec!(12));
        auction.record_bid(dec!(14));

        assert_eq!(auction.current_highest_bid, dec!(16));
        assert_eq!(auction.current_lowest_bid, dec!(12));
        assert_eq!(auction.total_bids, 3);
    }

    #[test]
    fn test_cancelled_auction_stays_cancelled() {
        let mut auction = Auction::started(1, dec!(100), dec!(15), Utc::now());
        auction.status = AuctionStatus::Cancelled;
        assert!(!auction.mark_completed());
        assert_eq!(auction.status, AuctionStatus::Cancelled);
    }

    #[test]
    fn test_price_improvement() {
        let mut auction = Auction::started(1, dec!(100), dec!(10), Utc::now());
        auction.record_bid(dec!(25));
        assert_eq!(auction.price_improvement_percent(), Some(dec!(150)));

        let free = Auction::started(2, dec!(100), dec!(0), Utc::now());
        assert_eq!(free.price_improvement_percent(), None);
    }

    #[test]
    fn test_price_improvement_overflow_is_none() {
        let mut auction = Auction::started(1, dec!(100), dec!(0.0000001), Utc::now());
        auction.record_bid(Decimal::from_i128_with_scale(7 * 10i128.pow(27), 0));
        assert_eq!(auction.price_improvement_percent(), None);

        let mut auction = Auction::started(2, dec!(100), Decimal::MIN, Utc::now());
        auction.record_bid(Decimal::MAX);
        assert_eq!(auction.price_improvement_percent(), None);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&AuctionStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
