//! Optimal trade sizing (Layer 3).
//!
//! Given a detected opportunity, find per-leg sizes `x` that stay as close as
//! possible to a reference allocation `r` (in Bregman divergence) while still
//! locking in a guaranteed profit:
//!
//! ```text
//! minimize    D(x || r)
//! subject to  0 <= x_j <= u_j
//!             sum_j sigma_j * (a_sj - p_j) * x_j >= R     for every scenario s
//! ```
//!
//! `a_sj` is 1 when leg `j`'s outcome is true in scenario `s`, `sigma_j` is
//! +1 for buys and -1 for sells, and `R = alpha * margin * target_payoff`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::solver::{
    ConvergenceStatus, Divergence, FrankWolfe, FrankWolfeConfig, LinearOracle, LpOracle,
    OracleReply, Polytope,
};
use crate::domain::error::DomainError;
use crate::domain::id::{ConditionKey, OutcomeKey};
use crate::domain::money::{from_f64, to_f64, Volume};
use crate::domain::opportunity::{Opportunity, TradeLeg};
use crate::domain::scenario::{ScenarioSet, SCENARIO_CAP};
use crate::domain::snapshot::Snapshot;
use crate::error::{Error, Result};
use crate::port::outbound::solver::Solver;

/// Slack allowed when testing whether a start point is feasible.
const FEASIBILITY_TOL: f64 = 1e-9;

/// Layer 3 settings (`[projection]`).
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub divergence: Divergence,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Wall-clock budget per opportunity.
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,

    /// Fraction of the detected margin the sized trade must still lock in.
    #[serde(default = "default_min_profit_fraction")]
    pub min_profit_fraction: Decimal,

    /// Pull toward the start point applied to oracle vertices under KL.
    #[serde(default = "default_contraction")]
    pub contraction: f64,

    /// Share of the resting depth a leg may take.
    #[serde(default = "default_liquidity_cap")]
    pub liquidity_cap: Decimal,
}

fn default_enabled() -> bool {
    true
}

fn default_max_iterations() -> usize {
    150
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_time_limit_ms() -> u64 {
    250
}

fn default_min_profit_fraction() -> Decimal {
    Decimal::new(9, 1) // 0.9
}

fn default_contraction() -> f64 {
    0.1
}

fn default_liquidity_cap() -> Decimal {
    Decimal::new(5, 1) // 0.5
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            divergence: Divergence::default(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            time_limit_ms: default_time_limit_ms(),
            min_profit_fraction: default_min_profit_fraction(),
            contraction: default_contraction(),
            liquidity_cap: default_liquidity_cap(),
        }
    }
}

impl ProjectionConfig {
    #[must_use]
    pub const fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

/// Inputs of one projection, one entry per leg where a vector is involved.
#[derive(Debug, Clone)]
pub struct ProjectionRequest {
    /// Liquidity bound `u_j` per leg.
    pub upper_bounds: Vec<Volume>,
    /// Reference allocation `r`.
    pub reference: Vec<Volume>,
    /// Number of unit baskets the profit floor is scaled to.
    pub target_payoff: Decimal,
    pub divergence: Divergence,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl ProjectionRequest {
    /// Defaults derived from the opportunity: the detected sizes as reference,
    /// the detected volume as target, and bounds at `liquidity_cap` of the
    /// resting depth (never below the detected size).
    #[must_use]
    pub fn for_opportunity(
        snapshot: &Snapshot,
        opportunity: &Opportunity,
        config: &ProjectionConfig,
    ) -> Self {
        let upper_bounds = opportunity
            .legs()
            .iter()
            .map(|leg| {
                let depth = snapshot
                    .outcome_key(leg.outcome())
                    .and_then(|k| snapshot.outcome(k).book().depth_at(leg.side(), leg.price()))
                    .unwrap_or(Decimal::ZERO);
                (depth * config.liquidity_cap).max(leg.size())
            })
            .collect();

        Self {
            upper_bounds,
            reference: opportunity.legs().iter().map(TradeLeg::size).collect(),
            target_payoff: opportunity.volume(),
            divergence: config.divergence,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }
}

/// Sized trade produced by Layer 3.
#[derive(Debug, Clone, Serialize)]
pub struct TradeVectorResult {
    /// The opportunity's legs carrying the optimized sizes.
    pub legs: Vec<TradeLeg>,
    /// Worst-case net profit across resolution scenarios.
    pub realized_profit: Decimal,
    /// Profit floor `R` the sizes were constrained to.
    pub target_profit: Decimal,
    pub capital: Decimal,
    pub divergence: f64,
    pub gap: f64,
    pub iterations: usize,
    pub status: ConvergenceStatus,
    pub trace: Vec<f64>,
}

/// Runs the Bregman projection for detected opportunities.
pub struct TradeProjector {
    solver: Arc<dyn Solver>,
    config: ProjectionConfig,
}

impl TradeProjector {
    pub fn new(solver: Arc<dyn Solver>, config: ProjectionConfig) -> Self {
        Self { solver, config }
    }

    #[must_use]
    pub const fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project with the defaults from [`ProjectionRequest::for_opportunity`].
    ///
    /// # Errors
    ///
    /// See [`TradeProjector::project`].
    pub fn refine(
        &self,
        snapshot: &Snapshot,
        opportunity: &Opportunity,
    ) -> Result<Option<TradeVectorResult>> {
        let request = ProjectionRequest::for_opportunity(snapshot, opportunity, &self.config);
        self.project(snapshot, opportunity, &request)
    }

    /// Size `opportunity` according to `request`.
    ///
    /// Returns `None` when no allocation within the bounds reaches the
    /// profit floor.
    ///
    /// # Errors
    ///
    /// Returns an error if the opportunity does not match the snapshot, the
    /// request has the wrong number of entries, or the solver fails.
    pub fn project(
        &self,
        snapshot: &Snapshot,
        opportunity: &Opportunity,
        request: &ProjectionRequest,
    ) -> Result<Option<TradeVectorResult>> {
        let legs = opportunity.legs();
        if request.upper_bounds.len() != legs.len() || request.reference.len() != legs.len() {
            return Err(Error::Solver(format!(
                "projection request sized for {} bounds and {} references, opportunity has {} legs",
                request.upper_bounds.len(),
                request.reference.len(),
                legs.len()
            )));
        }

        let outcomes = legs
            .iter()
            .map(|leg| {
                snapshot
                    .outcome_key(leg.outcome())
                    .ok_or_else(|| missing("outcome", leg.outcome().as_str()))
            })
            .collect::<std::result::Result<Vec<OutcomeKey>, _>>()?;
        let conditions = opportunity
            .conditions()
            .iter()
            .map(|id| {
                snapshot
                    .condition_key(id)
                    .ok_or_else(|| missing("condition", id.as_str()))
            })
            .collect::<std::result::Result<Vec<ConditionKey>, _>>()?;
        let relations = snapshot.relations_within(&conditions);
        let scenarios = ScenarioSet::enumerate(snapshot, &conditions, &relations, SCENARIO_CAP)?;

        let target_profit =
            self.config.min_profit_fraction * opportunity.margin() * request.target_payoff;
        let payoff_rows: Vec<Vec<Decimal>> = scenarios
            .iter()
            .map(|scenario| {
                legs.iter()
                    .zip(&outcomes)
                    .map(|(leg, outcome)| {
                        let resolves = if scenario.contains(outcome) {
                            Decimal::ONE
                        } else {
                            Decimal::ZERO
                        };
                        leg.side().sign() * (resolves - leg.price())
                    })
                    .collect()
            })
            .collect();

        let mut polytope = Polytope::new(request.upper_bounds.iter().map(|&u| to_f64(u)).collect());
        for row in &payoff_rows {
            polytope.push_row(row.iter().map(|&c| to_f64(c)).collect(), to_f64(target_profit));
        }
        let oracle = LpOracle::new(self.solver.as_ref(), &polytope);

        let reference: Vec<f64> = request.reference.iter().map(|&r| to_f64(r)).collect();
        let detected: Vec<f64> = legs.iter().map(|l| to_f64(l.size())).collect();
        let start = if polytope.contains(&reference, FEASIBILITY_TOL) {
            reference.clone()
        } else if polytope.contains(&detected, FEASIBILITY_TOL) {
            detected
        } else {
            match oracle.minimize(&vec![0.0; legs.len()])? {
                OracleReply::Vertex(vertex) => vertex,
                OracleReply::Empty => {
                    debug!(target_profit = %target_profit, "profit floor unreachable within bounds");
                    return Ok(None);
                }
                OracleReply::TimedOut => {
                    return Err(Error::SolverTimeout(format!(
                        "{} found no feasible start within the time limit",
                        self.solver.name()
                    )));
                }
            }
        };

        let frank_wolfe = FrankWolfe::new(FrankWolfeConfig {
            max_iterations: request.max_iterations,
            tolerance: request.tolerance,
            contraction: self.config.contraction,
            deadline: Some(Instant::now() + self.config.time_limit()),
        });
        let Some(run) = frank_wolfe.minimize(request.divergence, &reference, &start, &oracle)?
        else {
            return Ok(None);
        };

        let sized: Vec<TradeLeg> = legs
            .iter()
            .zip(&run.point)
            .map(|(leg, &x)| {
                TradeLeg::new(
                    leg.condition().clone(),
                    leg.outcome().clone(),
                    leg.side(),
                    leg.price(),
                    from_f64(x.max(0.0)),
                )
            })
            .collect();
        let realized_profit = payoff_rows
            .iter()
            .map(|row| row.iter().zip(&sized).map(|(c, leg)| *c * leg.size()).sum::<Decimal>())
            .min()
            .unwrap_or(Decimal::ZERO);
        let capital = sized.iter().map(TradeLeg::capital).sum();

        debug!(
            divergence = %request.divergence,
            iterations = run.iterations,
            gap = run.gap,
            status = ?run.status,
            realized_profit = %realized_profit,
            "trade vector"
        );

        Ok(Some(TradeVectorResult {
            legs: sized,
            realized_profit,
            target_profit,
            capital,
            divergence: run.divergence,
            gap: run.gap,
            iterations: run.iterations,
            status: run.status,
            trace: run.trace,
        }))
    }
}

fn missing(kind: &'static str, id: &str) -> Error {
    DomainError::MissingRecord {
        kind,
        id: id.to_string(),
    }
    .into()
}
