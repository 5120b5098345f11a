//! Detection, sizing and ranking.
//!
//! - [`detector`] - Layer 1 and Layer 2 detectors behind the [`Detector`] trait
//! - [`solver`] - Bregman divergences, linear oracles and Frank-Wolfe
//! - [`projection`] - Layer 3 trade sizing
//! - [`ranker`] - ordering and deduplication
//! - [`scan`] - the concurrent pass tying them together

pub mod detector;
pub mod projection;
pub mod ranker;
pub mod scan;
pub mod solver;

pub use detector::{
    CombinatorialDetector, Detection, DetectionConfig, Detector, SingleConditionDetector, WorkUnit,
};
pub use projection::{ProjectionConfig, ProjectionRequest, TradeProjector, TradeVectorResult};
pub use ranker::{rank, RankingConfig};
pub use scan::{RankedOpportunity, ScanPipeline, ScanReport, TASK_TIMEOUT_FACTOR};
