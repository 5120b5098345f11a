//! Solver port for linear and mixed-integer programming.
//!
//! - [`Solver`]: LP/ILP backend interface
//! - [`LpProblem`] / [`IlpProblem`]: problem definitions
//! - [`LpSolution`]: values plus a [`SolutionStatus`]
//!
//! Infeasible, unbounded and timed-out problems are reported through the
//! status, not as errors. `Err` is reserved for failures of the backend
//! itself.

use rust_decimal::Decimal;

use crate::domain::constraint::{Constraint, VariableBounds};
use crate::error::Result;

/// Linear and integer programming solver.
///
/// Implementations must be `Send + Sync`: Layer 2 groups and Layer 3
/// projections call the same solver from many blocking tasks at once.
pub trait Solver: Send + Sync {
    /// Solver name for logging.
    fn name(&self) -> &'static str;

    /// Minimize `objective · x` subject to the constraints and bounds.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backend cannot run at all.
    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution>;

    /// Minimize with integrality on [`IlpProblem::integer_vars`].
    ///
    /// # Errors
    ///
    /// Returns an error only when the backend cannot run at all.
    fn solve_ilp(&self, problem: &IlpProblem) -> Result<LpSolution>;
}

/// ```text
/// minimize    c^T * x
/// subject to  constraints
///             bounds on x
/// ```
#[derive(Debug, Clone)]
pub struct LpProblem {
    pub objective: Vec<Decimal>,
    pub constraints: Vec<Constraint>,
    pub bounds: Vec<VariableBounds>,
}

impl LpProblem {
    /// `num_vars` non-negative variables with a zero objective.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            objective: vec![Decimal::ZERO; num_vars],
            constraints: Vec::new(),
            bounds: vec![VariableBounds::default(); num_vars],
        }
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }
}

/// An [`LpProblem`] with integrality on some variables.
#[derive(Debug, Clone)]
pub struct IlpProblem {
    pub lp: LpProblem,
    /// Indices of variables restricted to integers.
    pub integer_vars: Vec<usize>,
}

impl IlpProblem {
    #[must_use]
    pub const fn new(lp: LpProblem, integer_vars: Vec<usize>) -> Self {
        Self { lp, integer_vars }
    }
}

#[derive(Debug, Clone)]
pub struct LpSolution {
    pub values: Vec<Decimal>,
    pub objective: Decimal,
    pub status: SolutionStatus,
}

impl LpSolution {
    /// A solution carrying only a non-optimal status.
    #[must_use]
    pub fn failed(status: SolutionStatus, num_vars: usize) -> Self {
        Self {
            values: vec![Decimal::ZERO; num_vars],
            objective: Decimal::ZERO,
            status,
        }
    }

    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Termination status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The wall-clock limit was hit before optimality was proven.
    TimedOut,
    Error,
}
