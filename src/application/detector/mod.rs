//! Arbitrage detectors (Layers 1 and 2).
//!
//! Both detectors implement [`Detector`]: they split a snapshot into
//! independent [`WorkUnit`]s and turn each unit into a [`Detection`]. The scan
//! pipeline runs every unit as its own blocking task, so a detector never
//! deals with threads or channels itself.
//!
//! - [`SingleConditionDetector`] - YES + NO mispricing on binary conditions
//! - [`CombinatorialDetector`] - minimum-cost unit baskets over related conditions

mod combinatorial;
mod group;
mod single;

pub use combinatorial::CombinatorialDetector;
pub use group::{group_conditions, ConditionGroup};
pub use single::{detect_single_condition, SingleConditionDetector};

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::diagnostic::Diagnostic;
use crate::domain::id::ConditionKey;
use crate::domain::opportunity::Opportunity;
use crate::domain::snapshot::Snapshot;

/// Detection thresholds shared by Layers 1 and 2.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Minimum profit per unit basket.
    #[serde(default = "default_min_profit")]
    pub min_profit: Decimal,

    /// Tolerance absorbing float error in threshold comparisons.
    #[serde(default = "default_epsilon")]
    pub epsilon: Decimal,

    /// Largest total outcome count a combinatorial group may have.
    #[serde(default = "default_max_set_size")]
    pub max_set_size: usize,

    /// Restrict basket quantities to whole lots.
    #[serde(default)]
    pub integer_lots: bool,

    /// Lot size used to floor volumes when `integer_lots` is set.
    #[serde(default = "default_lot_size")]
    pub lot_size: Decimal,

    /// Number of Layer 1 partitions. Defaults to the CPU count.
    #[serde(default)]
    pub partitions: Option<usize>,
}

fn default_min_profit() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_epsilon() -> Decimal {
    Decimal::new(1, 6) // 0.000001
}

fn default_max_set_size() -> usize {
    24
}

fn default_lot_size() -> Decimal {
    Decimal::ONE
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_profit: default_min_profit(),
            epsilon: default_epsilon(),
            max_set_size: default_max_set_size(),
            integer_lots: false,
            lot_size: default_lot_size(),
            partitions: None,
        }
    }
}

impl DetectionConfig {
    /// Baskets must cost strictly less than this to be reported.
    #[must_use]
    pub fn buy_threshold(&self) -> Decimal {
        Decimal::ONE - self.min_profit - self.epsilon
    }

    /// Sell proceeds must exceed this to be reported.
    #[must_use]
    pub fn sell_threshold(&self) -> Decimal {
        Decimal::ONE + self.min_profit + self.epsilon
    }
}

/// An independent slice of a snapshot for one detector task.
#[derive(Debug, Clone)]
pub struct WorkUnit {
    /// Label used as the diagnostic scope if the task fails.
    pub label: String,
    pub conditions: Vec<ConditionKey>,
}

/// Result of running a detector over one work unit.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub opportunities: Vec<Opportunity>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Detection {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn skipped(diagnostic: Diagnostic) -> Self {
        Self {
            opportunities: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }

    /// Fold `other` into `self`.
    pub fn merge(&mut self, other: Detection) {
        self.opportunities.extend(other.opportunities);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// A detection layer.
///
/// Implementations are shared across blocking tasks and must be
/// `Send + Sync`.
pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Split `snapshot` into units that can be detected independently.
    fn partition(&self, snapshot: &Snapshot) -> Vec<WorkUnit>;

    /// Detect opportunities within one unit.
    fn detect(&self, snapshot: &Snapshot, unit: &WorkUnit) -> Detection;

    /// Wall-clock budget for one unit; `None` runs unbounded.
    fn budget(&self) -> Option<Duration> {
        None
    }
}
