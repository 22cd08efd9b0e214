//! Typed system events streamed by the auction backend

mod kind;
mod payloads;

pub use kind::EventKind;
pub use payloads::{
    AggregatorStatus, AuctionCompleted, AuctionStarted, BessNodeStatus, BidAccepted, BidPlaced,
    BidRejected, EnergyDepleted, EnergyRecharged, QueryResponse, QuerySent,
};

use serde::Serialize;
use serde_json::Value;

use crate::entities::SystemMetrics;

/// A decoded system event. Serializes in the tagged wire shape
/// (`{"BidPlaced": {...}}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SystemEvent {
    AuctionStarted(AuctionStarted),
    BidPlaced(BidPlaced),
    BidAccepted(BidAccepted),
    BidRejected(BidRejected),
    AuctionCompleted(AuctionCompleted),
    QuerySent(QuerySent),
    QueryResponse(QueryResponse),
    EnergyDepleted(EnergyDepleted),
    EnergyRecharged(EnergyRecharged),
    #[serde(rename = "BESSNodeStatus")]
    BessNodeStatus(BessNodeStatus),
    AggregatorStatus(AggregatorStatus),
    SystemMetrics(SystemMetrics),
}

impl SystemEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SystemEvent::AuctionStarted(_) => EventKind::AuctionStarted,
            SystemEvent::BidPlaced(_) => EventKind::BidPlaced,
            SystemEvent::BidAccepted(_) => EventKind::BidAccepted,
            SystemEvent::BidRejected(_) => EventKind::BidRejected,
            SystemEvent::AuctionCompleted(_) => EventKind::AuctionCompleted,
            SystemEvent::QuerySent(_) => EventKind::QuerySent,
            SystemEvent::QueryResponse(_) => EventKind::QueryResponse,
            SystemEvent::EnergyDepleted(_) => EventKind::EnergyDepleted,
            SystemEvent::EnergyRecharged(_) => EventKind::EnergyRecharged,
            SystemEvent::BessNodeStatus(_) => EventKind::BessNodeStatus,
            SystemEvent::AggregatorStatus(_) => EventKind::AggregatorStatus,
            SystemEvent::SystemMetrics(_) => EventKind::SystemMetrics,
        }
    }

    /// Render the event as a tagged wire frame
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A system event together with the payload object it was decoded from
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    pub event: SystemEvent,
    /// The event's payload as received, without the wire tag
    pub payload: Value,
}

impl DecodedEvent {
    pub fn new(event: SystemEvent, payload: Value) -> Self {
        Self { event, payload }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tagged_frame_shape() {
        let event = SystemEvent::AuctionStarted(AuctionStarted {
            auction_id: 7,
            total_energy: dec!(30),
            reserve_price: dec!(12.5),
        });

        let frame: Value = serde_json::from_str(&event.to_frame().unwrap()).unwrap();
        let object = frame.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(frame["AuctionStarted"]["auction_id"], 7);
    }

    #[test]
    fn test_bess_status_frame_tag() {
        let event = SystemEvent::BessNodeStatus(BessNodeStatus {
            device_id: 101,
            energy_available: None,
            battery_health: Some(1),
            is_online: Some(true),
        });

        let frame: Value = serde_json::from_str(&event.to_frame().unwrap()).unwrap();
        assert!(frame.get("BESSNodeStatus").is_some());
        assert!(frame["BESSNodeStatus"].get("energy_available").is_none());
        assert_eq!(event.kind(), EventKind::BessNodeStatus);
    }
}
