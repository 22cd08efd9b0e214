//! Transport connection management

pub mod manager;
pub mod state;
pub mod transport;
pub mod ws;

pub use manager::ConnectionManager;
pub use state::{CloseOutcome, ConnectionState, ConnectionStatus, MAX_ATTEMPTS_REACHED};
pub use transport::{ConnectionHandler, Connector, Link};
pub use ws::{WsConnector, WsLink};
