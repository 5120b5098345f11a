//! Wiring from [`Config`] to a ready [`ScanPipeline`].

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::solver::HighsSolver;
use crate::application::detector::{CombinatorialDetector, Detector, SingleConditionDetector};
use crate::application::projection::TradeProjector;
use crate::application::scan::{ScanPipeline, TASK_TIMEOUT_FACTOR};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::solver::Solver;

/// HiGHS bounded by `[solver] time_limit_ms`.
#[must_use]
pub fn build_solver(config: &Config) -> Arc<dyn Solver> {
    Arc::new(HighsSolver::with_time_limit(config.solver.time_limit()))
}

/// Both detectors, plus Layer 3 when `[projection] enabled` is set.
#[must_use]
pub fn build_pipeline(config: &Config, solver: Arc<dyn Solver>) -> ScanPipeline {
    let task_budget = config.solver.time_limit() * TASK_TIMEOUT_FACTOR;
    let detectors: Vec<Arc<dyn Detector>> = vec![
        Arc::new(SingleConditionDetector::new(config.detection.clone())),
        Arc::new(
            CombinatorialDetector::new(Arc::clone(&solver), config.detection.clone())
                .with_budget(task_budget),
        ),
    ];
    debug!(
        solver = solver.name(),
        task_budget_ms = task_budget.as_millis() as u64,
        refine = config.projection.enabled,
        "pipeline built"
    );

    let pipeline = ScanPipeline::new(detectors, config.ranking.clone());
    if config.projection.enabled {
        pipeline.with_projector(Arc::new(TradeProjector::new(solver, config.projection.clone())))
    } else {
        pipeline
    }
}
