//! In-memory snapshot store for callers that assemble snapshots themselves.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::snapshot::Snapshot;
use crate::error::{Error, Result};
use crate::port::outbound::market_data::MarketDataSource;

/// Holds the latest published snapshot. Versions must strictly increase.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleSnapshot`] if `snapshot` is not newer than the
    /// one already held; the held snapshot is left in place.
    pub fn publish(&self, snapshot: Snapshot) -> Result<()> {
        let mut current = self.current.write();
        if let Some(held) = current.as_ref() {
            if snapshot.version() <= held.version() {
                return Err(Error::StaleSnapshot {
                    offered: snapshot.version(),
                    current: held.version(),
                });
            }
        }
        debug!(version = snapshot.version(), "published snapshot");
        *current = Some(Arc::new(snapshot));
        Ok(())
    }

    /// Version of the held snapshot, if any.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.current.read().as_ref().map(|s| s.version())
    }

    #[must_use]
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }
}

#[async_trait]
impl MarketDataSource for SnapshotStore {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn current_snapshot(&self) -> Result<Arc<Snapshot>> {
        self.latest().ok_or(Error::NoSnapshot)
    }
}
