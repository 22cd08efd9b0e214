//! Connection manager
//!
//! Owns one logical connection to the backend and keeps it alive with a
//! fixed-interval retry loop. Each cycle runs on a spawned driver task that
//! is cancelled through a `CancellationToken`.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::state::{CloseOutcome, ConnectionState};
use super::transport::{ConnectionHandler, Connector, Link};
use crate::config::{ConnectionConfig, ReconnectPolicy, validate_endpoint};
use crate::error::TransportError;

/// State shared between the manager and its driver task
#[derive(Default)]
struct Shared {
    state: Mutex<ConnectionState>,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

struct Driver {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

pub struct ConnectionManager<C: Connector> {
    url: String,
    policy: ReconnectPolicy,
    connector: Arc<C>,
    handler: Arc<dyn ConnectionHandler>,
    shared: Arc<Shared>,
    driver: Option<Driver>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(config: &ConnectionConfig, connector: C, handler: Arc<dyn ConnectionHandler>) -> Self {
        Self {
            url: config.url.clone(),
            policy: config.policy(),
            connector: Arc::new(connector),
            handler,
            shared: Arc::new(Shared::default()),
            driver: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Copy of the current connection state
    pub fn state(&self) -> ConnectionState {
        self.shared.state.lock().clone()
    }

    /// Start a connection cycle
    ///
    /// Does nothing while a cycle is already active. From `Disconnected` or
    /// `Failed` the attempt counter starts again at 0. Must be called from
    /// within a tokio runtime.
    pub fn connect(&mut self) {
        if self.shared.state.lock().status.is_active() {
            log::debug!("connect() ignored, cycle already active for {}", self.url);
            return;
        }

        if let Err(e) = validate_endpoint(&self.url) {
            let error = TransportError::InvalidEndpoint(e.to_string());
            log::warn!("{}", error);
            self.shared.state.lock().fail(error.to_string());
            self.handler.on_error(&error);
            return;
        }

        if !self.shared.state.lock().request_connect() {
            return;
        }

        // A previous cycle may have ended in Failed; its task is finished.
        if let Some(old) = self.driver.take() {
            old.cancel.cancel();
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(drive(
            self.url.clone(),
            self.policy,
            Arc::clone(&self.connector),
            Arc::clone(&self.handler),
            Arc::clone(&self.shared),
            cancel.clone(),
        ));
        self.driver = Some(Driver { cancel, task });
    }

    /// Close the live link and cancel any pending retry
    pub async fn disconnect(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.cancel.cancel();
            if let Err(e) = driver.task.await {
                log::warn!("Connection driver ended abnormally: {}", e);
            }
        }
        *self.shared.outbound.lock() = None;
        self.shared.state.lock().disconnected();
        log::info!("Disconnected from {}", self.url);
    }

    /// Queue a JSON message on the live link
    ///
    /// Returns false, logging a warning, when not connected. Nothing is
    /// buffered for later delivery.
    pub fn send<M: Serialize>(&self, message: &M) -> bool {
        if !self.shared.state.lock().is_connected() {
            log::warn!("Cannot send to {}: {}", self.url, TransportError::NotConnected);
            return false;
        }

        let frame = match serde_json::to_string(message) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("{}", TransportError::Serialization(e.to_string()));
                return false;
            }
        };

        match self.shared.outbound.lock().as_ref() {
            Some(tx) => tx.send(frame).is_ok(),
            None => {
                log::warn!("Cannot send message, link is closing");
                false
            }
        }
    }
}

impl<C: Connector> Drop for ConnectionManager<C> {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.cancel.cancel();
        }
    }
}

/// Driver task: dial, pump frames, decide on retry, repeat
async fn drive<C: Connector>(
    url: String,
    policy: ReconnectPolicy,
    connector: Arc<C>,
    handler: Arc<dyn ConnectionHandler>,
    shared: Arc<Shared>,
    cancel: CancellationToken,
) {
    loop {
        shared.state.lock().begin_attempt();
        log::info!("Connecting to {}", url);

        let dialed = tokio::select! {
            _ = cancel.cancelled() => return,
            dialed = connector.connect(&url) => dialed,
        };

        match dialed {
            Ok(mut link) => {
                let (tx, rx) = mpsc::unbounded_channel();
                *shared.outbound.lock() = Some(tx);
                shared.state.lock().opened();
                log::info!("Connected to {}", url);
                handler.on_open();

                let cancelled = pump(link.as_mut(), rx, handler.as_ref(), &shared, &cancel).await;
                *shared.outbound.lock() = None;
                link.close().await;

                if cancelled {
                    handler.on_close();
                    return;
                }
            }
            Err(e) => {
                log::warn!("Connection to {} failed: {}", url, e);
                shared.state.lock().errored(e.to_string());
                handler.on_error(&e);
            }
        }

        handler.on_close();
        let outcome = shared.state.lock().closed(&policy);
        match outcome {
            CloseOutcome::Retry { attempt, delay } => {
                log::info!(
                    "Reconnecting to {} in {:?} (attempt {}/{})",
                    url,
                    delay,
                    attempt,
                    policy.max_attempts
                );
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            CloseOutcome::Exhausted => {
                log::warn!(
                    "Giving up on {} after {} reconnection attempts",
                    url,
                    policy.max_attempts
                );
                return;
            }
        }
    }
}

/// Move frames both ways until the link ends. Returns true if cancelled.
async fn pump(
    link: &mut dyn Link,
    mut outbound: mpsc::UnboundedReceiver<String>,
    handler: &dyn ConnectionHandler,
    shared: &Shared,
    cancel: &CancellationToken,
) -> bool {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return true,
            Some(frame) = outbound.recv() => {
                if let Err(e) = link.send(frame).await {
                    log::warn!("{}", e);
                    shared.state.lock().errored(e.to_string());
                    handler.on_error(&e);
                    return false;
                }
            }
            incoming = link.recv() => match incoming {
                Ok(Some(frame)) => {
                    log::trace!("Frame received ({} bytes)", frame.len());
                    handler.on_message(&frame);
                }
                Ok(None) => {
                    log::info!("Connection closed by peer");
                    return false;
                }
                Err(e) => {
                    log::warn!("{}", e);
                    shared.state.lock().errored(e.to_string());
                    handler.on_error(&e);
                    return false;
                }
            },
        }
    }
}
