//! Linear minimization oracles over a trade polytope.
//!
//! Frank-Wolfe never projects directly. Each iteration asks an oracle for the
//! vertex of the feasible set that minimizes a linear objective:
//!
//! ```text
//! v = argmin_{x in P} <direction, x>
//! P = { x : 0 <= x <= upper, a_k . x >= b_k for every row k }
//! ```
//!
//! [`LpOracle`] hands each query to the injected [`Solver`]. [`VertexOracle`]
//! enumerates the vertices once and scans them; it needs no backend but only
//! scales to a handful of variables.

use rust_decimal::Decimal;

use crate::domain::constraint::{Constraint, VariableBounds};
use crate::domain::money::{from_f64, to_f64};
use crate::error::{Error, Result};
use crate::port::outbound::solver::{LpProblem, SolutionStatus, Solver};

/// Largest number of active-set combinations [`VertexOracle::enumerate`] tries.
const MAX_COMBINATIONS: u128 = 200_000;

/// Pivot magnitude below which a system is treated as singular.
const PIVOT_EPS: f64 = 1e-12;

/// A box-bounded polytope with `>=` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Polytope {
    upper: Vec<f64>,
    rows: Vec<(Vec<f64>, f64)>,
}

impl Polytope {
    /// The box `0 <= x <= upper`.
    #[must_use]
    pub fn new(upper: Vec<f64>) -> Self {
        Self {
            upper,
            rows: Vec::new(),
        }
    }

    /// Add the row `coefficients . x >= rhs`.
    #[must_use]
    pub fn with_row(mut self, coefficients: Vec<f64>, rhs: f64) -> Self {
        self.rows.push((coefficients, rhs));
        self
    }

    pub fn push_row(&mut self, coefficients: Vec<f64>, rhs: f64) {
        self.rows.push((coefficients, rhs));
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.upper.len()
    }

    /// Whether `x` lies in the polytope within `tolerance`.
    #[must_use]
    pub fn contains(&self, x: &[f64], tolerance: f64) -> bool {
        x.len() == self.dim()
            && x
                .iter()
                .zip(&self.upper)
                .all(|(&xi, &ui)| xi >= -tolerance && xi <= ui + tolerance)
            && self
                .rows
                .iter()
                .all(|(a, b)| dot(a, x) >= b - tolerance)
    }

    /// The LP `min direction . x` over this polytope.
    #[must_use]
    pub fn to_lp(&self, direction: &[f64]) -> LpProblem {
        let mut lp = LpProblem::new(self.dim());
        lp.objective = direction.iter().map(|&d| from_f64(d)).collect();
        lp.bounds = self
            .upper
            .iter()
            .map(|&u| VariableBounds::bounded(Decimal::ZERO, from_f64(u)))
            .collect();
        lp.constraints = self
            .rows
            .iter()
            .map(|(a, b)| Constraint::geq(a.iter().map(|&c| from_f64(c)).collect(), from_f64(*b)))
            .collect();
        lp
    }
}

/// Answer to one linear minimization query.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleReply {
    /// The minimizing vertex.
    Vertex(Vec<f64>),
    /// The feasible set is empty.
    Empty,
    /// The backend hit its time limit before reaching a vertex.
    TimedOut,
}

/// Linear minimization over a fixed feasible set.
pub trait LinearOracle: Send + Sync {
    /// Minimizing vertex for `direction`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails. Running out of time is a
    /// reply, not an error.
    fn minimize(&self, direction: &[f64]) -> Result<OracleReply>;
}

/// Oracle backed by an LP solver.
pub struct LpOracle<'a> {
    solver: &'a dyn Solver,
    polytope: &'a Polytope,
}

impl<'a> LpOracle<'a> {
    #[must_use]
    pub fn new(solver: &'a dyn Solver, polytope: &'a Polytope) -> Self {
        Self { solver, polytope }
    }
}

impl LinearOracle for LpOracle<'_> {
    fn minimize(&self, direction: &[f64]) -> Result<OracleReply> {
        // Scale to unit max-norm so rounding to solver precision keeps the
        // relative ordering of coefficients.
        let scale = direction.iter().fold(0.0_f64, |m, d| m.max(d.abs()));
        let normalized: Vec<f64> = if scale > 0.0 {
            direction.iter().map(|d| d / scale).collect()
        } else {
            direction.to_vec()
        };

        let solution = self.solver.solve_lp(&self.polytope.to_lp(&normalized))?;
        match solution.status {
            SolutionStatus::Optimal => Ok(OracleReply::Vertex(
                solution.values.into_iter().map(to_f64).collect(),
            )),
            SolutionStatus::Infeasible | SolutionStatus::Unbounded => Ok(OracleReply::Empty),
            SolutionStatus::TimedOut => Ok(OracleReply::TimedOut),
            SolutionStatus::Error => Err(Error::Solver(format!(
                "{} oracle returned {:?}",
                self.solver.name(),
                solution.status
            ))),
        }
    }
}

/// Oracle over an explicit vertex list.
#[derive(Debug, Clone)]
pub struct VertexOracle {
    vertices: Vec<Vec<f64>>,
}

impl VertexOracle {
    #[must_use]
    pub fn new(vertices: Vec<Vec<f64>>) -> Self {
        Self { vertices }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec<f64>] {
        &self.vertices
    }

    /// Enumerate the vertices of `polytope`.
    ///
    /// Every choice of `n` tight hyperplanes (bounds or rows) is solved; the
    /// feasible, distinct solutions are the vertices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Solver`] when the number of hyperplane combinations
    /// is too large to enumerate.
    pub fn enumerate(polytope: &Polytope) -> Result<Self> {
        let n = polytope.dim();
        if n == 0 {
            return Ok(Self::new(vec![Vec::new()]));
        }

        let mut planes: Vec<(Vec<f64>, f64)> = Vec::with_capacity(2 * n + polytope.rows.len());
        for j in 0..n {
            let mut unit = vec![0.0; n];
            unit[j] = 1.0;
            planes.push((unit.clone(), 0.0));
            planes.push((unit, polytope.upper[j]));
        }
        planes.extend(polytope.rows.iter().cloned());

        match binomial(planes.len(), n) {
            Some(total) if total <= MAX_COMBINATIONS => {}
            Some(total) => {
                return Err(Error::Solver(format!(
                    "vertex enumeration needs {total} combinations"
                )))
            }
            None => {
                return Err(Error::Solver(format!(
                    "vertex enumeration over {} planes in {n} dimensions overflows",
                    planes.len()
                )))
            }
        }

        let mut vertices: Vec<Vec<f64>> = Vec::new();
        let mut pick: Vec<usize> = (0..n).collect();
        loop {
            let system: Vec<&(Vec<f64>, f64)> = pick.iter().map(|&i| &planes[i]).collect();
            if let Some(x) = solve_square(&system) {
                if polytope.contains(&x, 1e-9)
                    && !vertices.iter().any(|v| distance(v, &x) < 1e-9)
                {
                    vertices.push(x);
                }
            }
            if !next_combination(&mut pick, planes.len()) {
                break;
            }
        }

        Ok(Self::new(vertices))
    }
}

impl LinearOracle for VertexOracle {
    fn minimize(&self, direction: &[f64]) -> Result<OracleReply> {
        Ok(self
            .vertices
            .iter()
            .min_by(|a, b| dot(direction, a).total_cmp(&dot(direction, b)))
            .cloned()
            .map_or(OracleReply::Empty, OracleReply::Vertex))
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0_f64, |m, (x, y)| m.max((x - y).abs()))
}

/// `n choose k`, or `None` if it does not fit in a `u128`.
fn binomial(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    (0..k).try_fold(1_u128, |acc, i| {
        acc.checked_mul((n - i) as u128).map(|p| p / (i + 1) as u128)
    })
}

/// Advance `pick` to the next `k`-subset of `0..n` in lexicographic order.
fn next_combination(pick: &mut [usize], n: usize) -> bool {
    let k = pick.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if pick[i] < n - k + i {
            pick[i] += 1;
            for j in i + 1..k {
                pick[j] = pick[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// Solve `a_i . x = b_i` for a square system by Gaussian elimination with
/// partial pivoting. `None` if singular.
fn solve_square(system: &[&(Vec<f64>, f64)]) -> Option<Vec<f64>> {
    let n = system.len();
    let mut m: Vec<Vec<f64>> = system
        .iter()
        .map(|(a, b)| {
            let mut row = a.clone();
            row.push(*b);
            row
        })
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot][col].abs() < PIVOT_EPS {
            return None;
        }
        m.swap(col, pivot);
        let pivot_row = m[col].clone();
        for (row, values) in m.iter_mut().enumerate() {
            if row == col {
                continue;
            }
            let factor = values[col] / pivot_row[col];
            if factor != 0.0 {
                for (v, p) in values[col..].iter_mut().zip(&pivot_row[col..]) {
                    *v -= factor * p;
                }
            }
        }
    }

    Some((0..n).map(|i| m[i][n] / m[i][i]).collect())
}
