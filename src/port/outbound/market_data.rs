//! Market data port.
//!
//! The scan pipeline pulls one snapshot per pass. Where the snapshot comes
//! from (a file, an in-memory store fed by a live client) is the adapter's
//! business.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::snapshot::Snapshot;
use crate::error::Result;

/// Source of immutable market snapshots.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// The most recent snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when no snapshot can be produced (unreadable
    /// document, nothing published yet).
    async fn current_snapshot(&self) -> Result<Arc<Snapshot>>;
}
