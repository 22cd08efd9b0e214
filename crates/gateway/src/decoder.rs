//! Event decoder
//!
//! Turns one raw text frame into a typed [`DecodedEvent`]. Three frame shapes
//! are accepted, tried in this order:
//!
//! ```text
//! tagged    {"BidPlaced": {"auction_id": 1, ...}}
//! envelope  {"type": "BidPlaced", "data": {"auction_id": 1, ...}}
//! flat      {"auction_id": 1, "bid_price": 21.5, ...}
//! ```
//!
//! Flat frames are only recognised for the auction lifecycle kinds that
//! older backends emitted untagged.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use wattwatch_core::{DecodedEvent, EventKind, SystemEvent};

use crate::error::DecodeError;

/// Decode a raw frame. Pure and synchronous.
pub fn decode(raw: &str) -> Result<DecodedEvent, DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;

    let Value::Object(frame) = value else {
        return Err(DecodeError::MalformedPayload(
            "frame is not a JSON object".to_string(),
        ));
    };

    let (tag, payload) = split_frame(frame)?;
    let event = decode_payload(&tag, payload.clone())?;
    Ok(DecodedEvent::new(event, payload))
}

/// Separate the event tag from its payload object
fn split_frame(mut frame: Map<String, Value>) -> Result<(String, Value), DecodeError> {
    let single_tag = match frame.keys().next() {
        Some(key) if frame.len() == 1 && is_tag_shaped(key) => Some(key.clone()),
        _ => None,
    };
    if let Some(tag) = single_tag {
        if EventKind::from_tag(&tag).is_none() {
            return Err(DecodeError::UnknownEventType(tag));
        }
        return match frame.remove(&tag) {
            Some(payload @ Value::Object(_)) => Ok((tag, payload)),
            _ => Err(DecodeError::MalformedPayload(format!(
                "payload of {tag} is not an object"
            ))),
        };
    }

    if let Some(Value::String(tag)) = frame.get("type") {
        let tag = tag.clone();
        return match frame.remove("data") {
            Some(data @ Value::Object(_)) => Ok((tag, data)),
            Some(_) => Err(DecodeError::MalformedPayload(format!(
                "data of {tag} is not an object"
            ))),
            None => Err(DecodeError::MalformedPayload(format!(
                "envelope for {tag} has no data"
            ))),
        };
    }

    match infer_flat_kind(&frame) {
        Some(kind) => Ok((kind.as_str().to_string(), Value::Object(frame))),
        None => Err(DecodeError::MalformedPayload(
            "frame matches no known event shape".to_string(),
        )),
    }
}

/// Event tags are PascalCase; payload fields are snake_case
fn is_tag_shaped(key: &str) -> bool {
    key.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Recognise an untagged frame by its field set
fn infer_flat_kind(frame: &Map<String, Value>) -> Option<EventKind> {
    let has = |field: &str| frame.contains_key(field);

    if has("auction_id") && has("total_energy") && has("reserve_price") {
        Some(EventKind::AuctionStarted)
    } else if has("auction_id") && has("bid_price") {
        Some(EventKind::BidPlaced)
    } else if has("auction_id") && has("final_price") && !has("winner_aggregator_id") {
        Some(EventKind::BidAccepted)
    } else if has("aggregator_id") && has("bess_id") && has("reason") {
        Some(EventKind::BidRejected)
    } else {
        None
    }
}

fn decode_payload(tag: &str, payload: Value) -> Result<SystemEvent, DecodeError> {
    let event = match tag {
        "AuctionStarted" => SystemEvent::AuctionStarted(parse(tag, payload)?),
        "BidPlaced" => SystemEvent::BidPlaced(parse(tag, payload)?),
        "BidAccepted" => SystemEvent::BidAccepted(parse(tag, payload)?),
        "BidRejected" => SystemEvent::BidRejected(parse(tag, payload)?),
        "AuctionCompleted" => SystemEvent::AuctionCompleted(parse(tag, payload)?),
        "QuerySent" => SystemEvent::QuerySent(parse(tag, payload)?),
        "QueryResponse" => SystemEvent::QueryResponse(parse(tag, payload)?),
        "EnergyDepleted" => SystemEvent::EnergyDepleted(parse(tag, payload)?),
        "EnergyRecharged" => SystemEvent::EnergyRecharged(parse(tag, payload)?),
        "BESSNodeStatus" => SystemEvent::BessNodeStatus(parse(tag, payload)?),
        "AggregatorStatus" => SystemEvent::AggregatorStatus(parse(tag, payload)?),
        "SystemMetrics" => SystemEvent::SystemMetrics(parse(tag, payload)?),
        other => return Err(DecodeError::UnknownEventType(other.to_string())),
    };
    Ok(event)
}

fn parse<T: DeserializeOwned>(tag: &str, payload: Value) -> Result<T, DecodeError> {
    serde_json::from_value(payload).map_err(|e| DecodeError::MalformedPayload(format!("{tag}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wattwatch_core::events::{AggregatorStatus, BidPlaced};

    const BID_FIELDS: &str =
        r#"{"auction_id": 4, "aggregator_id": 201, "bess_id": 101, "bid_price": 21.5, "energy_amount": 12}"#;

    fn expected_bid() -> SystemEvent {
        SystemEvent::BidPlaced(BidPlaced {
            auction_id: 4,
            aggregator_id: 201,
            bess_id: 101,
            bid_price: dec!(21.5),
            energy_amount: dec!(12),
        })
    }

    // ========================================================================
    // Frame shapes
    // ========================================================================

    #[test]
    fn test_tagged_frame() {
        let raw = format!(r#"{{"BidPlaced": {BID_FIELDS}}}"#);
        let decoded = decode(&raw).unwrap();

        assert_eq!(decoded.kind(), EventKind::BidPlaced);
        assert_eq!(decoded.event, expected_bid());
        assert_eq!(decoded.payload["bid_price"], 21.5);
    }

    #[test]
    fn test_envelope_frame_matches_tagged() {
        let raw = format!(
            r#"{{"type": "BidPlaced", "timestamp": "2025-01-01T00:00:00Z", "data": {BID_FIELDS}}}"#
        );
        assert_eq!(decode(&raw).unwrap().event, expected_bid());
    }

    #[test]
    fn test_flat_frame_matches_tagged() {
        assert_eq!(decode(BID_FIELDS).unwrap().event, expected_bid());
    }

    #[test]
    fn test_flat_auction_started_and_accepted() {
        let started = decode(r#"{"auction_id": 9, "total_energy": 40, "reserve_price": 15}"#)
            .unwrap();
        assert_eq!(started.kind(), EventKind::AuctionStarted);

        let accepted = decode(
            r#"{"auction_id": 9, "aggregator_id": 1, "bess_id": 2, "final_price": 18, "energy_amount": 5}"#,
        )
        .unwrap();
        assert_eq!(accepted.kind(), EventKind::BidAccepted);

        let rejected = decode(r#"{"aggregator_id": 1, "bess_id": 2, "reason": "below reserve"}"#)
            .unwrap();
        assert_eq!(rejected.kind(), EventKind::BidRejected);
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn test_unknown_tag() {
        let err = decode(r#"{"FooEvent": {"x": 1}}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnknownEventType("FooEvent".to_string()));
    }

    #[test]
    fn test_unknown_tag_with_scalar_payload() {
        let err = decode(r#"{"FooEvent": 1}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnknownEventType("FooEvent".to_string()));

        let err = decode(r#"{"BidPlaced": 1}"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedPayload("payload of BidPlaced is not an object".to_string())
        );
    }

    #[test]
    fn test_single_field_flat_frame_is_not_a_tag() {
        let err = decode(r#"{"auction_id": 3}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
        assert_eq!(err.tag(), None);
    }

    #[test]
    fn test_unknown_envelope_type() {
        let err = decode(r#"{"type": "FooEvent", "data": {}}"#).unwrap_err();
        assert_eq!(err.tag(), Some("FooEvent"));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            decode("{not json"),
            Err(DecodeError::MalformedPayload(_))
        ));
        assert!(matches!(decode("[1, 2]"), Err(DecodeError::MalformedPayload(_))));
        assert!(matches!(decode("{}"), Err(DecodeError::MalformedPayload(_))));
    }

    #[test]
    fn test_known_tag_missing_field() {
        let err = decode(r#"{"BidPlaced": {"auction_id": 4}}"#).unwrap_err();
        match err {
            DecodeError::MalformedPayload(msg) => assert!(msg.starts_with("BidPlaced")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unrecognised_flat_frame() {
        assert!(matches!(
            decode(r#"{"price": 1, "volume": 2}"#),
            Err(DecodeError::MalformedPayload(_))
        ));
    }

    // ========================================================================
    // Status events
    // ========================================================================

    #[test]
    fn test_status_needs_only_device_id() {
        let decoded = decode(r#"{"BESSNodeStatus": {"device_id": 101}}"#).unwrap();
        match decoded.event {
            SystemEvent::BessNodeStatus(status) => {
                assert_eq!(status.device_id, 101);
                assert_eq!(status.energy_available, None);
                assert_eq!(status.is_online, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_thin_aggregator_status() {
        let decoded = decode(
            r#"{"AggregatorStatus": {"device_id": 201, "strategy": "Aggressive", "success_rate": 62.5, "total_bids": 8}}"#,
        )
        .unwrap();

        assert_eq!(
            decoded.event,
            SystemEvent::AggregatorStatus(AggregatorStatus {
                device_id: 201,
                strategy: Some("Aggressive".to_string()),
                success_rate: Some(dec!(62.5)),
                total_bids: Some(8),
                successful_bids: None,
                total_energy_bought: None,
                average_bid_price: None,
                is_online: None,
            })
        );
    }

    #[test]
    fn test_every_kind_decodes_from_its_own_frame() {
        let frames = [
            r#"{"AuctionStarted": {"auction_id": 1, "total_energy": 30, "reserve_price": 15}}"#,
            r#"{"BidAccepted": {"auction_id": 1, "aggregator_id": 2, "bess_id": 3, "final_price": 20, "energy_amount": 5}}"#,
            r#"{"BidRejected": {"aggregator_id": 2, "bess_id": 3, "reason": "late"}}"#,
            r#"{"AuctionCompleted": {"auction_id": 1, "winner_aggregator_id": 2, "seller_bess_id": 3, "energy_sold": 5, "final_price": 20, "total_value": 100, "auction_duration_ms": 1200}}"#,
            r#"{"QuerySent": {"aggregator_id": 2, "bess_id": 3}}"#,
            r#"{"QueryResponse": {"bess_id": 3, "energy_available": 44, "percentage_for_sale": 30}}"#,
            r#"{"EnergyDepleted": {"bess_id": 3, "final_energy": 0, "energy_percentage": 0}}"#,
            r#"{"EnergyRecharged": {"bess_id": 3, "energy_added": 10, "new_total": 60, "energy_percentage": 60}}"#,
            r#"{"SystemMetrics": {"total_auctions": 3, "total_bids": 12, "avg_price_improvement_percent": 8.5, "active_bess_nodes": 4, "active_aggregators": 2}}"#,
        ];

        for raw in frames {
            let decoded = decode(raw).unwrap();
            let tag = decoded.kind().as_str();
            assert!(raw.contains(tag), "{raw} decoded as {tag}");
        }
    }
}
