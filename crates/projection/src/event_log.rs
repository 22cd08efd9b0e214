//! Live event log
//!
//! Bounded record of recently decoded events for the activity panel. Kept
//! apart from the projection; frames the decoder rejected never get here.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use wattwatch_core::{DecodedEvent, EventKind, SystemEvent, Timestamp};
use wattwatch_ports::{Clock, EventSink};

use crate::ring::BoundedRing;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveEventRecord {
    pub kind: EventKind,
    pub event: SystemEvent,
    /// Payload exactly as received
    pub payload: Value,
    pub received_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Kind(EventKind),
}

impl EventFilter {
    pub fn matches(&self, kind: EventKind) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Kind(wanted) => *wanted == kind,
        }
    }
}

impl From<EventKind> for EventFilter {
    fn from(kind: EventKind) -> Self {
        EventFilter::Kind(kind)
    }
}

#[derive(Debug, Clone)]
pub struct LiveEventLog {
    records: BoundedRing<LiveEventRecord>,
}

impl LiveEventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: BoundedRing::new(capacity),
        }
    }

    pub fn record(&mut self, event: &DecodedEvent, received_at: Timestamp) {
        self.records.push(LiveEventRecord {
            kind: event.kind(),
            event: event.event.clone(),
            payload: event.payload.clone(),
            received_at,
        });
    }

    /// Matching records, most recent first
    pub fn filter(&self, filter: EventFilter) -> impl Iterator<Item = &LiveEventRecord> {
        self.records
            .newest_first()
            .filter(move |record| filter.matches(record.kind))
    }

    pub fn recent(&self, filter: EventFilter, limit: usize) -> Vec<&LiveEventRecord> {
        self.filter(filter).take(limit).collect()
    }

    pub fn count(&self, filter: EventFilter) -> usize {
        self.filter(filter).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Clonable, clock-stamped handle to a [`LiveEventLog`]
#[derive(Clone)]
pub struct SharedEventLog {
    log: Arc<RwLock<LiveEventLog>>,
    clock: Arc<dyn Clock>,
}

impl SharedEventLog {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            log: Arc::new(RwLock::new(LiveEventLog::new(capacity))),
            clock,
        }
    }

    pub fn record(&self, event: &DecodedEvent) {
        let at = self.clock.now();
        self.log.write().record(event, at);
    }

    /// Cloned records, most recent first
    pub fn recent(&self, filter: EventFilter, limit: usize) -> Vec<LiveEventRecord> {
        self.log
            .read()
            .filter(filter)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn count(&self, filter: EventFilter) -> usize {
        self.log.read().count(filter)
    }

    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }

    pub fn clear(&self) {
        self.log.write().clear();
    }
}

impl EventSink for SharedEventLog {
    fn accept(&self, event: &DecodedEvent) {
        self.record(event);
    }

    fn name(&self) -> &str {
        "LiveEventLog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use wattwatch_clock::ManualClock;
    use wattwatch_core::events::{BidRejected, QuerySent};

    fn query(n: u64) -> DecodedEvent {
        DecodedEvent::new(
            SystemEvent::QuerySent(QuerySent {
                aggregator_id: n,
                bess_id: 1,
            }),
            json!({"aggregator_id": n, "bess_id": 1}),
        )
    }

    fn rejected(n: u64) -> DecodedEvent {
        DecodedEvent::new(
            SystemEvent::BidRejected(BidRejected {
                aggregator_id: n,
                bess_id: 1,
                reason: "below reserve".to_string(),
            }),
            json!({"aggregator_id": n, "bess_id": 1, "reason": "below reserve"}),
        )
    }

    #[test]
    fn test_filter_is_most_recent_first() {
        let mut log = LiveEventLog::new(100);
        let at = Utc.timestamp_opt(0, 0).unwrap();
        log.record(&query(1), at);
        log.record(&rejected(2), at);
        log.record(&query(3), at);

        let all: Vec<_> = log.filter(EventFilter::All).map(|r| r.payload["aggregator_id"].clone()).collect();
        assert_eq!(all, vec![json!(3), json!(2), json!(1)]);

        let queries: Vec<_> = log
            .filter(EventKind::QuerySent.into())
            .map(|r| r.payload["aggregator_id"].clone())
            .collect();
        assert_eq!(queries, vec![json!(3), json!(1)]);

        assert_eq!(log.count(EventFilter::Kind(EventKind::BidRejected)), 1);
        assert_eq!(log.count(EventFilter::Kind(EventKind::SystemMetrics)), 0);
    }

    #[test]
    fn test_keeps_most_recent_hundred() {
        let mut log = LiveEventLog::new(100);
        let at = Utc.timestamp_opt(0, 0).unwrap();
        for n in 0..130 {
            log.record(&query(n), at);
        }

        assert_eq!(log.len(), 100);
        let newest = log.filter(EventFilter::All).next().unwrap();
        assert_eq!(newest.payload["aggregator_id"], 129);
        let oldest = log.filter(EventFilter::All).last().unwrap();
        assert_eq!(oldest.payload["aggregator_id"], 30);
    }

    #[test]
    fn test_recent_limit() {
        let mut log = LiveEventLog::new(10);
        let at = Utc.timestamp_opt(0, 0).unwrap();
        for n in 0..5 {
            log.record(&query(n), at);
        }
        assert_eq!(log.recent(EventFilter::All, 2).len(), 2);
        assert_eq!(log.recent(EventFilter::All, 50).len(), 5);
    }

    #[test]
    fn test_shared_log_stamps_with_clock() {
        let clock = ManualClock::at_epoch();
        let shared = SharedEventLog::new(100, Arc::new(clock.clone()));

        shared.accept(&query(1));
        clock.advance_ms(750);
        shared.accept(&rejected(2));

        let records = shared.recent(EventFilter::All, 10);
        assert_eq!(records[0].kind, EventKind::BidRejected);
        assert_eq!(records[0].received_at.timestamp_millis(), 750);
        assert_eq!(records[1].received_at.timestamp_millis(), 0);
        assert_eq!(shared.len(), 2);
    }
}
