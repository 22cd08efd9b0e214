use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminant of a system event, spelled as its wire tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    AuctionStarted,
    BidPlaced,
    BidAccepted,
    BidRejected,
    AuctionCompleted,
    QuerySent,
    QueryResponse,
    EnergyDepleted,
    EnergyRecharged,
    #[serde(rename = "BESSNodeStatus")]
    BessNodeStatus,
    AggregatorStatus,
    SystemMetrics,
}

impl EventKind {
    /// Every recognised kind, in wire-table order
    pub const ALL: [EventKind; 12] = [
        EventKind::AuctionStarted,
        EventKind::BidPlaced,
        EventKind::BidAccepted,
        EventKind::BidRejected,
        EventKind::AuctionCompleted,
        EventKind::QuerySent,
        EventKind::QueryResponse,
        EventKind::EnergyDepleted,
        EventKind::EnergyRecharged,
        EventKind::BessNodeStatus,
        EventKind::AggregatorStatus,
        EventKind::SystemMetrics,
    ];

    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AuctionStarted => "AuctionStarted",
            EventKind::BidPlaced => "BidPlaced",
            EventKind::BidAccepted => "BidAccepted",
            EventKind::BidRejected => "BidRejected",
            EventKind::AuctionCompleted => "AuctionCompleted",
            EventKind::QuerySent => "QuerySent",
            EventKind::QueryResponse => "QueryResponse",
            EventKind::EnergyDepleted => "EnergyDepleted",
            EventKind::EnergyRecharged => "EnergyRecharged",
            EventKind::BessNodeStatus => "BESSNodeStatus",
            EventKind::AggregatorStatus => "AggregatorStatus",
            EventKind::SystemMetrics => "SystemMetrics",
        }
    }

    /// Look up a kind by its exact wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
