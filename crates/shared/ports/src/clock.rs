use wattwatch_core::Timestamp;

/// Source of "now" for everything the projection timestamps
///
/// Wall time in the monitor binary, a manually stepped clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Identifier used in log lines
    fn name(&self) -> &str {
        "Clock"
    }
}
