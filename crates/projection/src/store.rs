use std::sync::Arc;

use parking_lot::RwLock;
use wattwatch_core::{DecodedEvent, SystemEvent};
use wattwatch_ports::{Clock, EventSink};

use crate::config::RetentionConfig;
use crate::engine::{Projection, Touched};
use crate::snapshot::ProjectionSnapshot;

/// Shared handle to the projection
///
/// Clones share the same state. `apply` holds the write lock for one
/// whole event, so readers never see half an update.
#[derive(Clone)]
pub struct ProjectionStore {
    projection: Arc<RwLock<Projection>>,
    clock: Arc<dyn Clock>,
}

impl ProjectionStore {
    pub fn new(retention: &RetentionConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_projection(Projection::new(retention), clock)
    }

    pub fn from_projection(projection: Projection, clock: Arc<dyn Clock>) -> Self {
        Self {
            projection: Arc::new(RwLock::new(projection)),
            clock,
        }
    }

    /// Apply one event, stamped with the store's clock
    pub fn apply(&self, event: &SystemEvent) -> Touched {
        let at = self.clock.now();
        self.projection.write().apply(event, at)
    }

    pub fn snapshot(&self) -> ProjectionSnapshot {
        let taken_at = self.clock.now();
        self.projection.read().snapshot(taken_at)
    }

    /// Run a read-only query against the live projection
    pub fn read<R>(&self, query: impl FnOnce(&Projection) -> R) -> R {
        query(&self.projection.read())
    }
}

impl EventSink for ProjectionStore {
    fn accept(&self, event: &DecodedEvent) {
        self.apply(&event.event);
    }

    fn name(&self) -> &str {
        "ProjectionStore"
    }
}
