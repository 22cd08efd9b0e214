//! wattwatch Gateway
//!
//! Everything between the auction backend's WebSocket and the typed event
//! stream:
//! - Connection lifecycle with fixed-interval reconnects
//! - Frame decoding into `SystemEvent`s
//! - Connection configuration
//!
//! ## Architecture
//!
//! ```text
//! Auction backend
//!         │ ws://.../ws
//!    ┌────▼──────────────┐
//!    │ ConnectionManager │  Connector / Link ports, WsConnector adapter
//!    └────┬──────────────┘
//!         │ on_message(raw frame)
//!    ┌────▼────┐
//!    │ decode  │  tagged | envelope | flat
//!    └────┬────┘
//!         │ DecodedEvent
//!    ┌────▼────────┐
//!    │ Projection, │
//!    │ event log   │
//!    └─────────────┘
//! ```

pub mod config;
pub mod connection;
pub mod decoder;
pub mod error;

// Re-export commonly used types
pub use config::{ConnectionConfig, ReconnectPolicy};
pub use connection::{
    ConnectionHandler, ConnectionManager, ConnectionState, ConnectionStatus, Connector, Link,
    WsConnector,
};
pub use decoder::decode;
pub use error::{ConfigError, DecodeError, TransportError};
