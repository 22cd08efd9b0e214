use std::sync::Arc;

use serde::Serialize;
use wattwatch_clock::SystemClock;
use wattwatch_gateway::{ConnectionManager, ConnectionState, Connector, WsConnector};
use wattwatch_ports::{Clock, EventSink};
use wattwatch_projection::{
    EventFilter, LiveEventRecord, ProjectionSnapshot, ProjectionStore, SharedEventLog,
};

use crate::config::MonitorConfig;
use crate::pipeline::{EventPipeline, PipelineStats};

/// The assembled monitor: one connection feeding the projection and the
/// live event log
///
/// ```text
/// ConnectionManager ──frames──► EventPipeline ──► ProjectionStore
///                                            └──► SharedEventLog
/// ```
pub struct Monitor<C: Connector = WsConnector> {
    config: MonitorConfig,
    store: ProjectionStore,
    events: SharedEventLog,
    pipeline: Arc<EventPipeline>,
    connection: ConnectionManager<C>,
}

impl Monitor<WsConnector> {
    /// Monitor over a real WebSocket, stamped with wall time
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_parts(config, WsConnector::new(), Arc::new(SystemClock::new()))
    }
}

impl<C: Connector> Monitor<C> {
    pub fn with_parts(config: MonitorConfig, connector: C, clock: Arc<dyn Clock>) -> Self {
        let store = ProjectionStore::new(&config.retention, Arc::clone(&clock));
        let events = SharedEventLog::new(config.retention.max_live_events, clock);

        // Projection first, then the log
        let sinks: Vec<Arc<dyn EventSink>> =
            vec![Arc::new(store.clone()), Arc::new(events.clone())];
        let pipeline = Arc::new(EventPipeline::new(sinks));
        let connection =
            ConnectionManager::new(&config.connection, connector, pipeline.clone());

        Self {
            config,
            store,
            events,
            pipeline,
            connection,
        }
    }

    /// Open the connection. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        log::info!("Starting monitor for {}", self.connection.url());
        self.connection.connect();
    }

    pub async fn shutdown(&mut self) {
        self.connection.disconnect().await;
        let stats = self.pipeline.stats();
        log::info!(
            "Monitor stopped: {} frames received, {} applied, {} dropped",
            stats.frames_received,
            stats.events_applied,
            stats.frames_dropped
        );
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn snapshot(&self) -> ProjectionSnapshot {
        self.store.snapshot()
    }

    /// Most recent first
    pub fn recent_events(&self, filter: EventFilter, limit: usize) -> Vec<LiveEventRecord> {
        self.events.recent(filter, limit)
    }

    pub fn event_count(&self, filter: EventFilter) -> usize {
        self.events.count(filter)
    }

    pub fn pipeline_stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    /// Shared handle for readers that outlive a borrow of the monitor
    pub fn store(&self) -> &ProjectionStore {
        &self.store
    }

    pub fn event_log(&self) -> &SharedEventLog {
        &self.events
    }

    /// Send a JSON message upstream; false when not connected
    pub fn send<M: Serialize>(&self, message: &M) -> bool {
        self.connection.send(message)
    }
}
