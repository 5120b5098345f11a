//! Snapshot source backed by a JSON document on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::dto::SnapshotDocument;
use crate::domain::snapshot::Snapshot;
use crate::error::Result;
use crate::port::outbound::market_data::MarketDataSource;

/// Reads and validates the document on every call, so edits to the file are
/// picked up by the next pass.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a snapshot document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or the envelope (version and
    /// the market, condition and outcome shapes) does not match the schema.
    /// Unreadable levels and relations only produce diagnostics.
    pub fn parse(json: &str) -> Result<Snapshot> {
        let document: SnapshotDocument = serde_json::from_str(json)?;
        Ok(document.into_snapshot())
    }
}

#[async_trait]
impl MarketDataSource for FileSnapshotSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn current_snapshot(&self) -> Result<Arc<Snapshot>> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        let snapshot = Self::parse(&json)?;
        if !snapshot.diagnostics().is_empty() {
            warn!(
                path = %self.path.display(),
                rejected = snapshot.diagnostics().len(),
                "snapshot contained invalid records"
            );
        }
        debug!(
            path = %self.path.display(),
            version = snapshot.version(),
            conditions = snapshot.conditions().len(),
            "loaded snapshot"
        );
        Ok(Arc::new(snapshot))
    }
}
