//! Error types for the gateway crate

use thiserror::Error;

/// Transport-level errors
///
/// These never reach the manager's owner as a `Result`; they end up in
/// `ConnectionState::last_error` and the `on_error` callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to create WebSocket connection: {0}")]
    InvalidEndpoint(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Receive failed: {0}")]
    Receive(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Not connected")]
    NotConnected,
}

/// Reasons a raw frame could not become a `DecodedEvent`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Unknown event type: {0}")]
    UnknownEventType(String),
}

impl DecodeError {
    /// The offending tag, for unknown event kinds
    pub fn tag(&self) -> Option<&str> {
        match self {
            DecodeError::UnknownEventType(tag) => Some(tag),
            DecodeError::MalformedPayload(_) => None,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("Reconnect interval must be greater than zero")]
    ZeroReconnectInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint_message() {
        let err = TransportError::InvalidEndpoint("relative URL without a base".into());
        assert_eq!(
            err.to_string(),
            "Failed to create WebSocket connection: relative URL without a base"
        );
    }

    #[test]
    fn test_not_connected_message() {
        assert_eq!(TransportError::NotConnected.to_string(), "Not connected");
    }

    #[test]
    fn test_decode_error_tag() {
        assert_eq!(
            DecodeError::UnknownEventType("FooEvent".into()).tag(),
            Some("FooEvent")
        );
        assert_eq!(DecodeError::MalformedPayload("eof".into()).tag(), None);
    }
}
