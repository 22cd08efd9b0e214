//! Frame pipeline
//!
//! Sits behind the connection manager: decodes each frame and fans the
//! event out to the sinks in registration order. Rejected frames are logged
//! once and dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use wattwatch_core::DecodedEvent;
use wattwatch_gateway::{ConnectionHandler, DecodeError, TransportError, decode};
use wattwatch_ports::EventSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub frames_received: u64,
    pub events_applied: u64,
    pub frames_dropped: u64,
    pub transport_errors: u64,
}

#[derive(Default)]
struct Counters {
    frames_received: AtomicU64,
    events_applied: AtomicU64,
    frames_dropped: AtomicU64,
    transport_errors: AtomicU64,
}

pub struct EventPipeline {
    sinks: Vec<Arc<dyn EventSink>>,
    counters: Counters,
}

impl EventPipeline {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self {
            sinks,
            counters: Counters::default(),
        }
    }

    /// Decode one frame and hand it to every sink
    pub fn handle_frame(&self, frame: &str) -> Result<DecodedEvent, DecodeError> {
        self.counters.frames_received.fetch_add(1, Ordering::Relaxed);

        let event = match decode(frame) {
            Ok(event) => event,
            Err(e) => {
                self.counters.frames_dropped.fetch_add(1, Ordering::Relaxed);
                log::warn!("Dropping frame: {}", e);
                return Err(e);
            }
        };

        for sink in &self.sinks {
            sink.accept(&event);
        }
        self.counters.events_applied.fetch_add(1, Ordering::Relaxed);
        log::debug!("{} applied", event.kind());
        Ok(event)
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            frames_received: self.counters.frames_received.load(Ordering::Relaxed),
            events_applied: self.counters.events_applied.load(Ordering::Relaxed),
            frames_dropped: self.counters.frames_dropped.load(Ordering::Relaxed),
            transport_errors: self.counters.transport_errors.load(Ordering::Relaxed),
        }
    }
}

impl ConnectionHandler for EventPipeline {
    fn on_open(&self) {
        log::debug!("Pipeline attached to live connection");
    }

    fn on_message(&self, frame: &str) {
        // Errors are already logged and counted
        let _ = self.handle_frame(frame);
    }

    fn on_error(&self, error: &TransportError) {
        self.counters.transport_errors.fetch_add(1, Ordering::Relaxed);
        log::debug!("Transport error seen by pipeline: {}", error);
    }
}
