//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is an open-source LP/MIP solver. Each call builds a fresh model, so
//! one [`HighsSolver`] can be shared by any number of blocking tasks.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel,
};
use rust_decimal::Decimal;
use tracing::trace;

use crate::domain::constraint::ConstraintSense;
use crate::domain::money::{from_f64, to_f64};
use crate::error::Result;
use crate::port::outbound::solver::{IlpProblem, LpProblem, LpSolution, SolutionStatus, Solver};

/// HiGHS-based LP/ILP solver with an optional per-call wall-clock limit.
#[derive(Debug, Default, Clone)]
pub struct HighsSolver {
    time_limit: Option<Duration>,
}

impl HighsSolver {
    #[must_use]
    pub const fn new() -> Self {
        Self { time_limit: None }
    }

    /// Bound every solve by `limit`; a solve that reaches it reports
    /// [`SolutionStatus::TimedOut`].
    #[must_use]
    pub const fn with_time_limit(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
        }
    }

    fn solve(&self, problem: &LpProblem, integer_vars: &[usize]) -> LpSolution {
        let n = problem.num_vars();
        if n == 0 {
            return LpSolution {
                values: vec![],
                objective: Decimal::ZERO,
                status: SolutionStatus::Optimal,
            };
        }

        let integer: HashSet<usize> = integer_vars.iter().copied().collect();
        let mut vars = variables!();
        let mut var_list = Vec::with_capacity(n);
        for (i, bounds) in problem.bounds.iter().enumerate() {
            let mut v = variable();
            if let Some(lb) = bounds.lower {
                v = v.min(to_f64(lb));
            }
            if let Some(ub) = bounds.upper {
                v = v.max(to_f64(ub));
            }
            if integer.contains(&i) {
                v = v.integer();
            }
            var_list.push(vars.add(v));
        }

        let objective: Expression = var_list
            .iter()
            .zip(&problem.objective)
            .map(|(v, c)| to_f64(*c) * *v)
            .sum();

        let mut model = vars.minimise(&objective).using(highs);
        if let Some(limit) = self.time_limit {
            model = model.set_time_limit(limit.as_secs_f64());
        }

        for row in &problem.constraints {
            let lhs: Expression = var_list
                .iter()
                .zip(&row.coefficients)
                .map(|(v, c)| to_f64(*c) * *v)
                .sum();
            let rhs = to_f64(row.rhs);
            model = match row.sense {
                ConstraintSense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
                ConstraintSense::LessEqual => model.with(constraint!(lhs <= rhs)),
                ConstraintSense::Equal => model.with(constraint!(lhs == rhs)),
            };
        }

        let started = Instant::now();
        let outcome = model.solve();
        let elapsed = started.elapsed();
        trace!(vars = n, rows = problem.constraints.len(), ?elapsed, "highs solve");

        match outcome {
            Ok(solution) => {
                if self.time_limit.is_some_and(|limit| elapsed >= limit) {
                    return LpSolution::failed(SolutionStatus::TimedOut, n);
                }
                let values: Vec<Decimal> =
                    var_list.iter().map(|v| from_f64(solution.value(*v))).collect();
                let objective = problem
                    .objective
                    .iter()
                    .zip(&values)
                    .map(|(c, v)| *c * *v)
                    .sum();
                LpSolution {
                    values,
                    objective,
                    status: SolutionStatus::Optimal,
                }
            }
            Err(ResolutionError::Infeasible) => LpSolution::failed(SolutionStatus::Infeasible, n),
            Err(ResolutionError::Unbounded) => LpSolution::failed(SolutionStatus::Unbounded, n),
            Err(err) => {
                trace!(error = %err, "highs failed");
                LpSolution::failed(SolutionStatus::Error, n)
            }
        }
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution> {
        Ok(self.solve(problem, &[]))
    }

    fn solve_ilp(&self, problem: &IlpProblem) -> Result<LpSolution> {
        Ok(self.solve(&problem.lp, &problem.integer_vars))
    }
}
