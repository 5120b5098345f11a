//! Frank-Wolfe algorithm for Bregman projection.
//!
//! The Frank-Wolfe (conditional gradient) algorithm solves:
//!
//! ```text
//! min_{x in P} D(x || r)
//! ```
//!
//! where `D` is a Bregman divergence and `P` the trade polytope. Rather than
//! projecting, each iteration asks a [`LinearOracle`] for the vertex `v`
//! minimizing `<grad D(x), v>` and moves toward it with step `2 / (k + 2)`.
//!
//! The gap `<grad D(x), x - v>` upper-bounds the suboptimality of `x` and is
//! the stopping criterion. The objective trace is non-increasing: a step that
//! would raise the divergence is halved until it does not.

use std::time::Instant;

use serde::Serialize;
use tracing::trace;

use super::bregman::Divergence;
use super::oracle::{dot, LinearOracle, OracleReply};
use crate::error::{Error, Result};

/// Steps shorter than this are abandoned instead of halved further.
const MIN_STEP: f64 = 1e-12;

/// Configuration for the Frank-Wolfe algorithm.
#[derive(Debug, Clone)]
pub struct FrankWolfeConfig {
    /// Maximum number of iterations before terminating.
    pub max_iterations: usize,
    /// Convergence tolerance for the Frank-Wolfe gap.
    pub tolerance: f64,
    /// Fraction by which oracle vertices are pulled toward the start point
    /// when the divergence needs interior iterates.
    pub contraction: f64,
    /// Wall-clock cut-off; reaching it ends the run as iteration-limited.
    pub deadline: Option<Instant>,
}

impl Default for FrankWolfeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 150,
            tolerance: 1e-6,
            contraction: 0.1,
            deadline: None,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceStatus {
    /// The gap fell below tolerance.
    Converged,
    /// The iteration or time budget ran out first.
    IterationLimited,
}

#[derive(Debug, Clone)]
pub struct FrankWolfeResult {
    pub point: Vec<f64>,
    pub divergence: f64,
    /// Last computed Frank-Wolfe gap.
    pub gap: f64,
    pub iterations: usize,
    pub status: ConvergenceStatus,
    /// Objective value at the start and after every iteration.
    pub trace: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FrankWolfe {
    config: FrankWolfeConfig,
}

impl FrankWolfe {
    #[must_use]
    pub const fn new(config: FrankWolfeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &FrankWolfeConfig {
        &self.config
    }

    /// Minimize `divergence(x || reference)` over the oracle's polytope,
    /// starting from the feasible point `start`.
    ///
    /// Returns `None` when the oracle reports an empty polytope on the first
    /// query. An oracle that runs out of time ends the run at the current
    /// iterate with [`ConvergenceStatus::IterationLimited`].
    ///
    /// # Errors
    ///
    /// Returns an error if the oracle fails, or if `reference` and `start`
    /// differ in length.
    pub fn minimize(
        &self,
        divergence: Divergence,
        reference: &[f64],
        start: &[f64],
        oracle: &dyn LinearOracle,
    ) -> Result<Option<FrankWolfeResult>> {
        if reference.len() != start.len() {
            return Err(Error::Solver(format!(
                "reference has {} coordinates, start has {}",
                reference.len(),
                start.len()
            )));
        }

        let contraction = if divergence.needs_interior() {
            self.config.contraction.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut x = start.to_vec();
        let mut objective = divergence.value(&x, reference);
        let mut trace = vec![objective];
        let mut gap = f64::INFINITY;
        let mut iterations = 0;
        let mut status = ConvergenceStatus::IterationLimited;

        for k in 0..self.config.max_iterations {
            if self.config.deadline.is_some_and(|d| Instant::now() >= d) {
                trace!(iteration = k, "deadline reached");
                break;
            }

            let grad = divergence.gradient(&x, reference);
            let mut vertex = match oracle.minimize(&grad)? {
                OracleReply::Vertex(vertex) => vertex,
                OracleReply::Empty if k == 0 => return Ok(None),
                OracleReply::Empty => break,
                OracleReply::TimedOut => {
                    trace!(iteration = k, "oracle timed out");
                    break;
                }
            };
            if contraction > 0.0 {
                for (v, s) in vertex.iter_mut().zip(start) {
                    *v = (1.0 - contraction) * *v + contraction * s;
                }
            }

            let toward: Vec<f64> = vertex.iter().zip(&x).map(|(v, xi)| v - xi).collect();
            gap = -dot(&grad, &toward);
            if gap < self.config.tolerance {
                status = ConvergenceStatus::Converged;
                break;
            }

            let mut step = 2.0 / (k as f64 + 2.0);
            loop {
                let candidate: Vec<f64> = x.iter().zip(&toward).map(|(xi, d)| xi + step * d).collect();
                let value = divergence.value(&candidate, reference);
                if value <= objective {
                    x = candidate;
                    objective = value;
                    break;
                }
                step *= 0.5;
                if step < MIN_STEP {
                    break;
                }
            }

            trace.push(objective);
            iterations = k + 1;
            trace!(iteration = iterations, gap, objective, step, "frank-wolfe step");
        }

        Ok(Some(FrankWolfeResult {
            point: x,
            divergence: objective,
            gap,
            iterations,
            status,
            trace,
        }))
    }
}
