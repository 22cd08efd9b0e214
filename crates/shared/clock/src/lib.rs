//! wattwatch Clock Infrastructure
//!
//! ```text
//! Clock (port)
//!     ├── SystemClock  wall time, used by the monitor binary
//!     └── ManualClock  stepped by hand, used by tests
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use wattwatch_ports::Clock;
