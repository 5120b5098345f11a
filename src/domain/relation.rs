//! Logical relations between outcomes of different conditions.
//!
//! Relations arrive from the metadata collaborator as [`RelationSpec`] values
//! naming outcomes by id. When a snapshot is assembled they are resolved to
//! [`ConstraintRelation`] values over arena keys.
//!
//! - **Exhaustive partition**: exactly one of the operands resolves true
//! - **Containment**: if the subset outcome resolves true, so does the superset
//!
//! # Examples
//!
//! ```
//! use arbscan::domain::relation::RelationSpec;
//!
//! let json = r#"{"type": "containment", "subset": "wins-by-10", "superset": "wins"}"#;
//! let spec: RelationSpec = serde_json::from_str(json).unwrap();
//! assert_eq!(spec.outcome_ids().len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{OutcomeId, OutcomeKey};

/// A relation as supplied by the metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelationSpec {
    /// Exactly one of `outcomes` resolves true.
    ExhaustivePartition {
        /// Operands of the partition; at least two, all distinct.
        outcomes: Vec<OutcomeId>,
    },

    /// `P(subset) <= P(superset)`.
    Containment {
        subset: OutcomeId,
        superset: OutcomeId,
    },
}

impl RelationSpec {
    /// Every outcome id the relation references.
    #[must_use]
    pub fn outcome_ids(&self) -> Vec<&OutcomeId> {
        match self {
            Self::ExhaustivePartition { outcomes } => outcomes.iter().collect(),
            Self::Containment { subset, superset } => vec![subset, superset],
        }
    }

    /// Resolve ids to keys through `lookup`, checking operand shape.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownOutcome`] for an id `lookup` cannot
    /// resolve and [`DomainError::MalformedRelation`] for a partition with
    /// fewer than two or repeated operands, or a containment of an outcome in
    /// itself.
    pub fn resolve<F>(&self, lookup: F) -> Result<ConstraintRelation, DomainError>
    where
        F: Fn(&OutcomeId) -> Option<OutcomeKey>,
    {
        let key = |id: &OutcomeId| {
            lookup(id).ok_or_else(|| DomainError::UnknownOutcome { id: id.to_string() })
        };

        match self {
            Self::ExhaustivePartition { outcomes } => {
                if outcomes.len() < 2 {
                    return Err(DomainError::MalformedRelation {
                        reason: format!("partition needs at least 2 operands, got {}", outcomes.len()),
                    });
                }
                let keys = outcomes.iter().map(key).collect::<Result<Vec<_>, _>>()?;
                let mut distinct = keys.clone();
                distinct.sort_unstable();
                distinct.dedup();
                if distinct.len() != keys.len() {
                    return Err(DomainError::MalformedRelation {
                        reason: "partition operands repeat".to_string(),
                    });
                }
                Ok(ConstraintRelation::ExhaustivePartition { outcomes: keys })
            }
            Self::Containment { subset, superset } => {
                if subset == superset {
                    return Err(DomainError::MalformedRelation {
                        reason: format!("outcome {subset} cannot contain itself"),
                    });
                }
                Ok(ConstraintRelation::Containment {
                    subset: key(subset)?,
                    superset: key(superset)?,
                })
            }
        }
    }
}

/// A relation resolved against a snapshot arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintRelation {
    ExhaustivePartition { outcomes: Vec<OutcomeKey> },
    Containment { subset: OutcomeKey, superset: OutcomeKey },
}

impl ConstraintRelation {
    /// Outcome keys the relation constrains.
    #[must_use]
    pub fn operands(&self) -> Vec<OutcomeKey> {
        match self {
            Self::ExhaustivePartition { outcomes } => outcomes.clone(),
            Self::Containment { subset, superset } => vec![*subset, *superset],
        }
    }

    /// Whether the relation holds under a truth assignment of its operands.
    pub fn holds<F>(&self, is_true: F) -> bool
    where
        F: Fn(OutcomeKey) -> bool,
    {
        match self {
            Self::ExhaustivePartition { outcomes } => {
                outcomes.iter().filter(|&&o| is_true(o)).count() == 1
            }
            Self::Containment { subset, superset } => !is_true(*subset) || is_true(*superset),
        }
    }
}
