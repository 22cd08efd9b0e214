use wattwatch_core::DecodedEvent;

/// Consumer of decoded events
///
/// Sinks are fed in arrival order from the connection's reader task, so
/// `accept` must not block for long.
pub trait EventSink: Send + Sync {
    fn accept(&self, event: &DecodedEvent);

    fn name(&self) -> &str {
        "EventSink"
    }
}
