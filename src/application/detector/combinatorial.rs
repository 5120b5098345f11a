//! Combinatorial arbitrage (Layer 2).
//!
//! For a group of related conditions the detector looks for the cheapest
//! *unit basket*: quantities of outcome tokens that pay at least 1 in every
//! resolution scenario the relations allow. If such a basket costs less than
//! `1 - min_profit`, buying it is an arbitrage.
//!
//! # Formulation
//!
//! ```text
//! variables   q_i in [0, 1]   quantity of outcome i per basket (integer if lots)
//!             y_i in {0, 1}   outcome i is bought at all
//! minimize    sum_i ask_i * q_i
//! subject to  q_i - y_i <= 0                     for each outcome
//!             sum_{i true in s} q_i >= 1         for each scenario s
//! ```
//!
//! Outcomes without ask liquidity are pinned to zero. A second solve breaks
//! ties among minimum-cost baskets: it minimizes `sum y_i` plus a small capital
//! weight while holding the cost within `epsilon` of the first optimum.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, info, trace, warn};

use super::group::{group_conditions, ConditionGroup};
use super::{Detection, DetectionConfig, Detector, WorkUnit};
use crate::domain::book::{PriceLevel, Side};
use crate::domain::constraint::{Constraint, VariableBounds};
use crate::domain::diagnostic::{Diagnostic, DiagnosticKind};
use crate::domain::id::OutcomeKey;
use crate::domain::money::SOLVER_DP;
use crate::domain::opportunity::{Direction, Opportunity, OpportunityKind, TradeLeg};
use crate::domain::scenario::{ScenarioSet, SCENARIO_CAP};
use crate::domain::snapshot::Snapshot;
use crate::port::outbound::solver::{IlpProblem, LpProblem, LpSolution, SolutionStatus, Solver};

/// Weight of basket cost relative to leg count in the tie-break solve.
const CAPITAL_WEIGHT: Decimal = dec!(0.001);

/// Layer 2 detector: one work unit per qualifying condition group.
pub struct CombinatorialDetector {
    solver: Arc<dyn Solver>,
    config: DetectionConfig,
    budget: Option<Duration>,
}

impl CombinatorialDetector {
    pub fn new(solver: Arc<dyn Solver>, config: DetectionConfig) -> Self {
        Self {
            solver,
            config,
            budget: None,
        }
    }

    /// Bound each group task by `budget`.
    #[must_use]
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Run the basket search for one group.
    pub fn detect_group(&self, snapshot: &Snapshot, group: &ConditionGroup) -> Detection {
        let label = group.label(snapshot);

        if group.outcomes > self.config.max_set_size {
            debug!(group = %label, outcomes = group.outcomes, "group too large");
            return Detection::skipped(Diagnostic::new(
                label,
                DiagnosticKind::GroupTooLarge,
                format!(
                    "{} outcomes exceeds max_set_size {}",
                    group.outcomes, self.config.max_set_size
                ),
            ));
        }

        let relations = snapshot.relations_within(&group.conditions);
        let scenarios =
            match ScenarioSet::enumerate(snapshot, &group.conditions, &relations, SCENARIO_CAP) {
                Ok(set) => set,
                Err(err) => {
                    warn!(group = %label, error = %err, "skipping group");
                    return Detection::skipped(Diagnostic::from_domain(label, &err));
                }
            };

        let basket = BasketProblem::build(snapshot, group, &scenarios, &self.config);
        trace!(
            group = %label,
            outcomes = basket.outcomes.len(),
            scenarios = scenarios.len(),
            "solving basket"
        );

        let phase_one = match self.solve(&basket.problem) {
            Ok(solution) => solution,
            Err((kind, message)) => {
                debug!(group = %label, %kind, %message, "no basket");
                return Detection::skipped(Diagnostic::new(label, kind, message));
            }
        };

        if phase_one.objective >= self.config.buy_threshold() {
            trace!(group = %label, cost = %phase_one.objective, "basket not profitable");
            return Detection::none();
        }

        let tie_break = basket.tie_break(phase_one.objective + self.config.epsilon);
        let chosen = match self.solve(&tie_break) {
            Ok(solution) => solution,
            Err((kind, message)) => {
                debug!(group = %label, %kind, %message, "tie-break failed, keeping first basket");
                phase_one
            }
        };

        match basket.into_opportunity(snapshot, &scenarios, &chosen.values, &self.config) {
            Ok(Some(opportunity)) => {
                info!(
                    group = %label,
                    cost = %opportunity.cost(),
                    margin = %opportunity.margin(),
                    legs = opportunity.legs().len(),
                    "combinatorial opportunity"
                );
                Detection {
                    opportunities: vec![opportunity],
                    diagnostics: Vec::new(),
                }
            }
            Ok(None) => Detection::none(),
            Err(message) => {
                warn!(group = %label, %message, "basket rejected");
                Detection::skipped(Diagnostic::new(label, DiagnosticKind::SolverError, message))
            }
        }
    }

    fn solve(&self, problem: &IlpProblem) -> Result<LpSolution, (DiagnosticKind, String)> {
        let solution = self
            .solver
            .solve_ilp(problem)
            .map_err(|err| (DiagnosticKind::SolverError, err.to_string()))?;
        let kind = match solution.status {
            SolutionStatus::Optimal => return Ok(solution),
            SolutionStatus::Infeasible | SolutionStatus::Unbounded => DiagnosticKind::SolverInfeasible,
            SolutionStatus::TimedOut => DiagnosticKind::SolverTimeout,
            SolutionStatus::Error => DiagnosticKind::SolverError,
        };
        Err((
            kind,
            format!("{} returned {:?}", self.solver.name(), solution.status),
        ))
    }
}

impl Detector for CombinatorialDetector {
    fn name(&self) -> &'static str {
        "combinatorial"
    }

    fn partition(&self, snapshot: &Snapshot) -> Vec<WorkUnit> {
        group_conditions(snapshot)
            .into_iter()
            .filter(ConditionGroup::is_combinatorial)
            .map(|g| WorkUnit {
                label: g.label(snapshot),
                conditions: g.conditions,
            })
            .collect()
    }

    fn detect(&self, snapshot: &Snapshot, unit: &WorkUnit) -> Detection {
        let relations = snapshot.relations_within(&unit.conditions).len();
        let outcomes = unit
            .conditions
            .iter()
            .map(|&k| snapshot.condition(k).outcomes().len())
            .sum();
        let group = ConditionGroup {
            conditions: unit.conditions.clone(),
            relations,
            outcomes,
        };
        self.detect_group(snapshot, &group)
    }

    fn budget(&self) -> Option<Duration> {
        self.budget
    }
}

/// The phase-one MILP plus what is needed to read its solution back.
struct BasketProblem {
    outcomes: Vec<OutcomeKey>,
    asks: Vec<Option<PriceLevel>>,
    problem: IlpProblem,
}

impl BasketProblem {
    fn build(
        snapshot: &Snapshot,
        group: &ConditionGroup,
        scenarios: &ScenarioSet,
        config: &DetectionConfig,
    ) -> Self {
        let outcomes: Vec<OutcomeKey> = group
            .conditions
            .iter()
            .flat_map(|&c| snapshot.condition(c).outcomes().iter().copied())
            .collect();
        let asks: Vec<Option<PriceLevel>> = outcomes
            .iter()
            .map(|&o| snapshot.outcome(o).book().best_ask().copied())
            .collect();
        let m = outcomes.len();

        let mut lp = LpProblem::new(2 * m);
        for (i, ask) in asks.iter().enumerate() {
            match ask {
                Some(level) => {
                    lp.objective[i] = level.price();
                    lp.bounds[i] = VariableBounds::unit();
                    lp.bounds[m + i] = VariableBounds::unit();
                }
                None => {
                    lp.bounds[i] = VariableBounds::fixed(Decimal::ZERO);
                    lp.bounds[m + i] = VariableBounds::fixed(Decimal::ZERO);
                }
            }

            let mut link = vec![Decimal::ZERO; 2 * m];
            link[i] = Decimal::ONE;
            link[m + i] = Decimal::NEGATIVE_ONE;
            lp.constraints.push(Constraint::leq(link, Decimal::ZERO));
        }

        for scenario in scenarios.iter() {
            let mut row = vec![Decimal::ZERO; 2 * m];
            for (i, o) in outcomes.iter().enumerate() {
                if scenario.contains(o) {
                    row[i] = Decimal::ONE;
                }
            }
            lp.constraints.push(Constraint::geq(row, Decimal::ONE));
        }

        let integer_vars = if config.integer_lots {
            (0..2 * m).collect()
        } else {
            (m..2 * m).collect()
        };

        Self {
            outcomes,
            asks,
            problem: IlpProblem::new(lp, integer_vars),
        }
    }

    /// Fewest legs, then least capital, among baskets costing at most `max_cost`.
    fn tie_break(&self, max_cost: Decimal) -> IlpProblem {
        let m = self.outcomes.len();
        let mut problem = self.problem.clone();
        let cost_row = problem.lp.objective.clone();
        problem.lp.constraints.push(Constraint::leq(cost_row, max_cost));

        for i in 0..m {
            problem.lp.objective[i] *= CAPITAL_WEIGHT;
            problem.lp.objective[m + i] = Decimal::ONE;
        }
        problem
    }

    /// Re-verify the solved basket and size it against best-level depth.
    fn into_opportunity(
        self,
        snapshot: &Snapshot,
        scenarios: &ScenarioSet,
        values: &[Decimal],
        config: &DetectionConfig,
    ) -> Result<Option<Opportunity>, String> {
        let quantities: Vec<Decimal> = values
            .iter()
            .take(self.outcomes.len())
            .map(|&q| if q <= config.epsilon { Decimal::ZERO } else { q })
            .collect();

        let payoff = scenarios
            .iter()
            .map(|s| {
                self.outcomes
                    .iter()
                    .zip(&quantities)
                    .filter(|(o, _)| s.contains(*o))
                    .map(|(_, q)| *q)
                    .sum::<Decimal>()
            })
            .min()
            .unwrap_or(Decimal::ZERO);
        if payoff < Decimal::ONE - config.epsilon {
            return Err(format!("basket pays {payoff} in its worst scenario"));
        }

        let mut cost = Decimal::ZERO;
        let mut volume: Option<Decimal> = None;
        for (ask, &q) in self.asks.iter().zip(&quantities) {
            if q.is_zero() {
                continue;
            }
            let Some(level) = ask else {
                return Err("basket buys an outcome without asks".to_string());
            };
            cost += level.price() * q;
            let depth = level.size() / q;
            volume = Some(volume.map_or(depth, |v| v.min(depth)));
        }
        if cost >= config.buy_threshold() {
            return Ok(None);
        }

        let mut volume = volume
            .unwrap_or(Decimal::ZERO)
            .round_dp_with_strategy(SOLVER_DP, RoundingStrategy::ToZero);
        if config.integer_lots && config.lot_size > Decimal::ZERO {
            volume = (volume / config.lot_size).floor() * config.lot_size;
        }
        if volume <= Decimal::ZERO {
            return Ok(None);
        }

        let mut legs = Vec::new();
        for ((&outcome, ask), &q) in self.outcomes.iter().zip(&self.asks).zip(&quantities) {
            if let (Some(level), false) = (ask, q.is_zero()) {
                let record = snapshot.outcome(outcome);
                legs.push(TradeLeg::new(
                    snapshot.condition(record.condition()).id().clone(),
                    record.id().clone(),
                    Side::Buy,
                    level.price(),
                    (q * volume).round_dp_with_strategy(SOLVER_DP, RoundingStrategy::ToZero),
                ));
            }
        }

        let conditions = scenarios
            .conditions()
            .iter()
            .map(|&c| snapshot.condition(c).id().clone())
            .collect();

        Opportunity::try_new(
            OpportunityKind::Combinatorial,
            Direction::BuyAll,
            legs,
            payoff,
            cost,
            volume,
            snapshot.version(),
            conditions,
        )
        .map(Some)
        .map_err(|err| err.to_string())
    }
}
