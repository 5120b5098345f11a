//! Scripted solver for detector and projector tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::port::outbound::solver::{IlpProblem, LpProblem, LpSolution, SolutionStatus, Solver};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum SolverScript {
    /// Optimal with these values; the objective is evaluated on the problem.
    Optimal(Vec<Decimal>),
    /// A non-optimal status with zeroed values.
    Status(SolutionStatus),
    /// The backend itself fails.
    Fail(String),
}

impl SolverScript {
    pub fn optimal(values: Vec<Decimal>) -> Self {
        Self::Optimal(values)
    }

    pub fn status(status: SolutionStatus) -> Self {
        Self::Status(status)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

/// Replays [`SolverScript`]s in order for both LP and ILP calls.
///
/// Once the script runs out every call fails with [`Error::Solver`].
#[derive(Debug, Default)]
pub struct ScriptedSolver {
    script: Mutex<VecDeque<SolverScript>>,
    calls: AtomicUsize,
}

impl ScriptedSolver {
    pub fn new(script: Vec<SolverScript>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of solve calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self, problem: &LpProblem) -> Result<LpSolution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().pop_front() {
            Some(SolverScript::Optimal(values)) => Ok(LpSolution {
                objective: problem
                    .objective
                    .iter()
                    .zip(&values)
                    .map(|(c, v)| *c * *v)
                    .sum(),
                values,
                status: SolutionStatus::Optimal,
            }),
            Some(SolverScript::Status(status)) => Ok(LpSolution::failed(status, problem.num_vars())),
            Some(SolverScript::Fail(message)) => Err(Error::Solver(message)),
            None => Err(Error::Solver("script exhausted".into())),
        }
    }
}

impl Solver for ScriptedSolver {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution> {
        self.next(problem)
    }

    fn solve_ilp(&self, problem: &IlpProblem) -> Result<LpSolution> {
        self.next(&problem.lp)
    }
}
