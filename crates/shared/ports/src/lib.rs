//! wattwatch Ports
//!
//! Trait boundaries between the domain crates and infrastructure.

mod clock;
mod sink;

pub use clock::Clock;
pub use sink::EventSink;
