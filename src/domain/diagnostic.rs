//! Per-skip records returned alongside every scan.

use std::fmt;

use serde::Serialize;

use super::error::DomainError;

/// Why a record, group or task was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Missing or inconsistent input data.
    DataError,
    /// A price or size outside its valid range.
    NumericError,
    /// The optimization problem had no feasible or bounded solution.
    SolverInfeasible,
    /// A solver call or a whole task exceeded its wall-clock budget.
    SolverTimeout,
    /// The solver backend failed or a task aborted.
    SolverError,
    /// A group exceeded the configured outcome count.
    GroupTooLarge,
    /// A group exceeded the scenario enumeration cap.
    ScenarioLimit,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DataError => "data_error",
            Self::NumericError => "numeric_error",
            Self::SolverInfeasible => "solver_infeasible",
            Self::SolverTimeout => "solver_timeout",
            Self::SolverError => "solver_error",
            Self::GroupTooLarge => "group_too_large",
            Self::ScenarioLimit => "scenario_limit",
        };
        f.write_str(name)
    }
}

/// One skipped item and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Diagnostic {
    /// Identifier of what was skipped (outcome, condition, group or task).
    pub scope: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(scope: impl Into<String>, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            kind,
            message: message.into(),
        }
    }

    /// Classify a domain error into a diagnostic for `scope`.
    #[must_use]
    pub fn from_domain(scope: impl Into<String>, err: &DomainError) -> Self {
        let kind = match err {
            e if e.is_numeric() => DiagnosticKind::NumericError,
            DomainError::TooManyScenarios { .. } => DiagnosticKind::ScenarioLimit,
            _ => DiagnosticKind::DataError,
        };
        Self::new(scope, kind, err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.scope, self.message)
    }
}
