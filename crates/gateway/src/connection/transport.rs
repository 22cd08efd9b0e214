//! Ports at the transport seam
//!
//! `Connector` dials, `Link` is one open connection. The WebSocket adapter
//! lives in [`super::ws`]; tests script their own.

use async_trait::async_trait;

use crate::error::TransportError;

#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &str) -> Result<Box<dyn Link>, TransportError>;
}

/// One open, bidirectional text connection
#[async_trait]
pub trait Link: Send {
    /// Next text frame, or `None` once the peer has closed
    ///
    /// Must be cancel safe: the driver races it against outbound frames.
    async fn recv(&mut self) -> Result<Option<String>, TransportError>;

    async fn send(&mut self, frame: String) -> Result<(), TransportError>;

    async fn close(&mut self);
}

/// Callbacks delivered to the single owner of a connection manager
///
/// Called from the driver task, one at a time.
pub trait ConnectionHandler: Send + Sync {
    fn on_open(&self) {}

    fn on_message(&self, frame: &str);

    fn on_close(&self) {}

    fn on_error(&self, error: &TransportError) {
        let _ = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ensure traits are object-safe
    fn _assert_connector_object_safe(_: &dyn Connector) {}
    fn _assert_link_object_safe(_: &mut dyn Link) {}
    fn _assert_handler_object_safe(_: &dyn ConnectionHandler) {}
}
