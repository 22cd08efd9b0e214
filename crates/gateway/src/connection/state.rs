//! Connection lifecycle state machine
//!
//! ```text
//! Disconnected --connect--> Connecting --open--> Connected
//!      ^                      |   ^                 |
//!      |                 error|   |retry timer      |close
//!      |                      v   |                 v
//!      +----disconnect---- Reconnecting <-----------+
//!                             |
//!                   attempts exhausted
//!                             v
//!                           Failed --connect--> Connecting
//! ```
//!
//! Everything here is synchronous; the manager's driver task calls these
//! transitions and does the waiting.

use std::fmt;
use std::time::Duration;

use crate::config::ReconnectPolicy;

pub const MAX_ATTEMPTS_REACHED: &str = "Max reconnection attempts reached";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Failed,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Reconnecting => "reconnecting",
            ConnectionStatus::Failed => "failed",
        }
    }

    /// True while a connection cycle owns the transport
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ConnectionStatus::Connecting
                | ConnectionStatus::Connected
                | ConnectionStatus::Reconnecting
        )
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the driver should do after a link closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Retry { attempt: u32, delay: Duration },
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    pub last_error: Option<String>,
    pub reconnect_attempt: u32,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Start a fresh cycle. Returns false, changing nothing, if one is
    /// already active.
    pub fn request_connect(&mut self) -> bool {
        if self.status.is_active() {
            return false;
        }
        self.status = ConnectionStatus::Connecting;
        self.reconnect_attempt = 0;
        self.last_error = None;
        true
    }

    /// The driver is about to dial
    pub fn begin_attempt(&mut self) {
        self.status = ConnectionStatus::Connecting;
    }

    pub fn opened(&mut self) {
        self.status = ConnectionStatus::Connected;
        self.reconnect_attempt = 0;
        self.last_error = None;
    }

    /// Record a transport error. Does not count as an attempt; the close
    /// that follows does.
    pub fn errored(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        if self.status == ConnectionStatus::Connecting {
            self.status = ConnectionStatus::Reconnecting;
        }
    }

    pub fn closed(&mut self, policy: &ReconnectPolicy) -> CloseOutcome {
        if self.reconnect_attempt < policy.max_attempts {
            self.reconnect_attempt += 1;
            self.status = ConnectionStatus::Reconnecting;
            CloseOutcome::Retry {
                attempt: self.reconnect_attempt,
                delay: policy.interval,
            }
        } else {
            self.fail(MAX_ATTEMPTS_REACHED);
            CloseOutcome::Exhausted
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ConnectionStatus::Failed;
        self.last_error = Some(message.into());
    }

    pub fn disconnected(&mut self) {
        *self = Self::default();
    }
}
