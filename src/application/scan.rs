//! The scan pipeline: detect, rank, refine.
//!
//! ```text
//! Arc<Snapshot> --> partition --> [spawn_blocking per unit] --mpsc--> join
//!                                                                   |
//!                         ScanReport <-- [Layer 3 per opportunity] <-- rank
//! ```
//!
//! Every detector work unit and every projection runs as its own blocking
//! task under a wall-clock timeout. A task that overruns or panics is
//! discarded whole and leaves a diagnostic in its place.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::detector::{Detection, Detector};
use super::projection::{TradeProjector, TradeVectorResult};
use super::ranker::{rank, RankingConfig};
use crate::domain::diagnostic::{Diagnostic, DiagnosticKind};
use crate::domain::opportunity::Opportunity;
use crate::domain::snapshot::Snapshot;
use crate::error::{Error, Result};
use crate::port::outbound::market_data::MarketDataSource;

/// Task budgets are this multiple of the configured solver time limit.
pub const TASK_TIMEOUT_FACTOR: u32 = 4;

/// Ranked output of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub snapshot_version: u64,
    pub opportunities: Vec<RankedOpportunity>,
    /// Every skipped record, group or task, sorted.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedOpportunity {
    pub opportunity: Opportunity,
    /// Layer 3 sizing; absent when refinement is off or found nothing.
    pub sizing: Option<TradeVectorResult>,
}

impl AsRef<Opportunity> for RankedOpportunity {
    fn as_ref(&self) -> &Opportunity {
        &self.opportunity
    }
}

enum TaskFailure {
    TimedOut(Duration),
    Aborted(String),
}

impl TaskFailure {
    fn into_diagnostic(self, scope: String) -> Diagnostic {
        match self {
            Self::TimedOut(budget) => Diagnostic::new(
                scope,
                DiagnosticKind::SolverTimeout,
                format!("task exceeded {budget:?}"),
            ),
            Self::Aborted(reason) => Diagnostic::new(
                scope,
                DiagnosticKind::SolverError,
                format!("task failed: {reason}"),
            ),
        }
    }
}

async fn join_within<T>(
    handle: JoinHandle<T>,
    budget: Option<Duration>,
) -> std::result::Result<T, TaskFailure> {
    let joined = match budget {
        Some(budget) => tokio::time::timeout(budget, handle)
            .await
            .map_err(|_| TaskFailure::TimedOut(budget))?,
        None => handle.await,
    };
    joined.map_err(|err| TaskFailure::Aborted(err.to_string()))
}

/// Runs detectors concurrently over one snapshot and ranks the results.
pub struct ScanPipeline {
    detectors: Vec<Arc<dyn Detector>>,
    projector: Option<Arc<TradeProjector>>,
    ranking: RankingConfig,
}

impl ScanPipeline {
    pub fn new(detectors: Vec<Arc<dyn Detector>>, ranking: RankingConfig) -> Self {
        Self {
            detectors,
            projector: None,
            ranking,
        }
    }

    /// Refine every ranked opportunity with `projector`.
    #[must_use]
    pub fn with_projector(mut self, projector: Arc<TradeProjector>) -> Self {
        self.projector = Some(projector);
        self
    }

    #[must_use]
    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    /// Fetch the current snapshot from `source` and scan it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the source cannot produce a snapshot.
    pub async fn scan_source(&self, source: &dyn MarketDataSource) -> Result<ScanReport> {
        let snapshot = source.current_snapshot().await?;
        debug!(source = source.name(), version = snapshot.version(), "snapshot loaded");
        Ok(self.run(snapshot).await)
    }

    /// One full pass over `snapshot`.
    pub async fn run(&self, snapshot: Arc<Snapshot>) -> ScanReport {
        let detection = self.detect(&snapshot).await;
        let found = detection.opportunities.len();

        let ranked = rank(detection.opportunities, self.ranking.limit);
        let mut diagnostics: Vec<Diagnostic> = snapshot.diagnostics().to_vec();
        diagnostics.extend(detection.diagnostics);

        let opportunities = match &self.projector {
            Some(projector) if projector.config().enabled => {
                self.refine(projector, &snapshot, ranked, &mut diagnostics).await
            }
            _ => ranked
                .into_iter()
                .map(|opportunity| RankedOpportunity {
                    opportunity,
                    sizing: None,
                })
                .collect(),
        };

        diagnostics.sort();
        info!(
            version = snapshot.version(),
            found,
            reported = opportunities.len(),
            diagnostics = diagnostics.len(),
            "scan complete"
        );

        ScanReport {
            snapshot_version: snapshot.version(),
            opportunities,
            diagnostics,
        }
    }

    async fn detect(&self, snapshot: &Arc<Snapshot>) -> Detection {
        let (tx, mut rx) = mpsc::unbounded_channel::<Detection>();

        for detector in &self.detectors {
            let units = detector.partition(snapshot);
            debug!(detector = detector.name(), units = units.len(), "partitioned");

            for unit in units {
                let tx = tx.clone();
                let detector = Arc::clone(detector);
                let snapshot = Arc::clone(snapshot);
                let budget = detector.budget();
                let scope = unit.label.clone();

                tokio::spawn(async move {
                    let handle = tokio::task::spawn_blocking(move || detector.detect(&snapshot, &unit));
                    let detection = join_within(handle, budget).await.unwrap_or_else(|failure| {
                        warn!(unit = %scope, "detector task discarded");
                        Detection::skipped(failure.into_diagnostic(scope))
                    });
                    // the receiver outlives every sender
                    let _ = tx.send(detection);
                });
            }
        }
        drop(tx);

        let mut merged = Detection::none();
        while let Some(detection) = rx.recv().await {
            merged.merge(detection);
        }
        merged
    }

    async fn refine(
        &self,
        projector: &Arc<TradeProjector>,
        snapshot: &Arc<Snapshot>,
        ranked: Vec<Opportunity>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<RankedOpportunity> {
        let budget = projector.config().time_limit() * TASK_TIMEOUT_FACTOR;
        let (tx, mut rx) = mpsc::unbounded_channel();

        for (index, opportunity) in ranked.iter().enumerate() {
            let tx = tx.clone();
            let projector = Arc::clone(projector);
            let snapshot = Arc::clone(snapshot);
            let opportunity = opportunity.clone();

            tokio::spawn(async move {
                let handle =
                    tokio::task::spawn_blocking(move || projector.refine(&snapshot, &opportunity));
                let _ = tx.send((index, join_within(handle, Some(budget)).await));
            });
        }
        drop(tx);

        let mut sizings: Vec<Option<TradeVectorResult>> = vec![None; ranked.len()];
        while let Some((index, outcome)) = rx.recv().await {
            let scope = projection_scope(&ranked[index]);
            match outcome {
                Ok(Ok(Some(result))) => sizings[index] = Some(result),
                Ok(Ok(None)) => diagnostics.push(Diagnostic::new(
                    scope,
                    DiagnosticKind::SolverInfeasible,
                    "no allocation within liquidity bounds reaches the profit floor",
                )),
                Ok(Err(Error::Domain(err))) => diagnostics.push(Diagnostic::from_domain(scope, &err)),
                Ok(Err(err @ Error::SolverTimeout(_))) => diagnostics.push(Diagnostic::new(
                    scope,
                    DiagnosticKind::SolverTimeout,
                    err.to_string(),
                )),
                Ok(Err(err)) => diagnostics.push(Diagnostic::new(
                    scope,
                    DiagnosticKind::SolverError,
                    err.to_string(),
                )),
                Err(failure) => {
                    warn!(scope = %scope, "projection task discarded");
                    diagnostics.push(failure.into_diagnostic(scope));
                }
            }
        }

        ranked
            .into_iter()
            .zip(sizings)
            .map(|(opportunity, sizing)| RankedOpportunity {
                opportunity,
                sizing,
            })
            .collect()
    }
}

fn projection_scope(opportunity: &Opportunity) -> String {
    let ids: Vec<&str> = opportunity.conditions().iter().map(|c| c.as_str()).collect();
    format!("projection[{}]", ids.join(","))
}
