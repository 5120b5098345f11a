//! Resolution scenarios for a set of conditions.
//!
//! A scenario picks exactly one true outcome per condition. Only scenarios
//! that satisfy every supplied relation are kept. Enumeration is a depth-first
//! walk that checks each relation as soon as all of its operands' conditions
//! are assigned, so contradictory branches are pruned early.

use std::collections::HashMap;

use super::error::DomainError;
use super::id::{ConditionKey, OutcomeKey};
use super::relation::ConstraintRelation;
use super::snapshot::Snapshot;

/// Upper bound on enumerated scenarios per group.
pub const SCENARIO_CAP: usize = 4096;

/// The consistent joint resolutions of a set of conditions.
#[derive(Debug, Clone)]
pub struct ScenarioSet {
    conditions: Vec<ConditionKey>,
    scenarios: Vec<Vec<OutcomeKey>>,
}

impl ScenarioSet {
    /// Enumerate every scenario of `conditions` consistent with `relations`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ContradictoryRelations`] when no scenario
    /// survives and [`DomainError::TooManyScenarios`] once more than `cap`
    /// scenarios have been found.
    pub fn enumerate(
        snapshot: &Snapshot,
        conditions: &[ConditionKey],
        relations: &[&ConstraintRelation],
        cap: usize,
    ) -> Result<Self, DomainError> {
        let position: HashMap<ConditionKey, usize> = conditions
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();

        // checks[d] holds the relations decidable once depth d is assigned
        let mut checks: Vec<Vec<&ConstraintRelation>> = vec![Vec::new(); conditions.len()];
        for &relation in relations {
            let deepest = relation
                .operands()
                .iter()
                .filter_map(|&o| position.get(&snapshot.outcome(o).condition()).copied())
                .max();
            if let Some(depth) = deepest {
                checks[depth].push(relation);
            }
        }

        let walk = Walk {
            snapshot,
            conditions,
            position: &position,
            checks: &checks,
            cap,
        };
        let mut scenarios = Vec::new();
        let mut assignment = Vec::with_capacity(conditions.len());
        walk.descend(&mut assignment, &mut scenarios)?;

        if scenarios.is_empty() {
            return Err(DomainError::ContradictoryRelations);
        }

        Ok(Self {
            conditions: conditions.to_vec(),
            scenarios,
        })
    }

    /// Conditions in the order scenarios assign them.
    #[must_use]
    pub fn conditions(&self) -> &[ConditionKey] {
        &self.conditions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Each scenario as its list of true outcomes, one per condition.
    pub fn iter(&self) -> impl Iterator<Item = &[OutcomeKey]> {
        self.scenarios.iter().map(Vec::as_slice)
    }
}

struct Walk<'a> {
    snapshot: &'a Snapshot,
    conditions: &'a [ConditionKey],
    position: &'a HashMap<ConditionKey, usize>,
    checks: &'a [Vec<&'a ConstraintRelation>],
    cap: usize,
}

impl Walk<'_> {
    fn descend(
        &self,
        assignment: &mut Vec<OutcomeKey>,
        out: &mut Vec<Vec<OutcomeKey>>,
    ) -> Result<(), DomainError> {
        let depth = assignment.len();
        if depth == self.conditions.len() {
            if out.len() == self.cap {
                return Err(DomainError::TooManyScenarios { cap: self.cap });
            }
            out.push(assignment.clone());
            return Ok(());
        }

        for &outcome in self.snapshot.condition(self.conditions[depth]).outcomes() {
            assignment.push(outcome);
            let current: &[OutcomeKey] = assignment;
            let consistent = self.checks[depth]
                .iter()
                .all(|r| r.holds(|o| self.is_true(current, o)));
            if consistent {
                self.descend(assignment, out)?;
            }
            assignment.pop();
        }
        Ok(())
    }

    fn is_true(&self, assignment: &[OutcomeKey], outcome: OutcomeKey) -> bool {
        let condition = self.snapshot.outcome(outcome).condition();
        self.position
            .get(&condition)
            .and_then(|&p| assignment.get(p))
            .is_some_and(|&chosen| chosen == outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::{ConditionId, OutcomeId};
    use crate::domain::relation::RelationSpec;
    use crate::domain::snapshot::{ConditionDraft, MarketDraft, OutcomeDraft, SnapshotBuilder};

    fn binary(id: &str) -> ConditionDraft {
        ConditionDraft::new(id)
            .outcome(OutcomeDraft::new(format!("{id}-yes")))
            .outcome(OutcomeDraft::new(format!("{id}-no")))
    }

    fn keys(snapshot: &Snapshot, ids: &[&str]) -> Vec<ConditionKey> {
        ids.iter()
            .map(|id| snapshot.condition_key(&ConditionId::from(*id)).unwrap())
            .collect()
    }

    #[test]
    fn unconstrained_conditions_yield_the_product() {
        let snapshot = SnapshotBuilder::new(1)
            .market(
                MarketDraft::new("m")
                    .condition(binary("a"))
                    .condition(
                        ConditionDraft::new("b")
                            .outcome(OutcomeDraft::new("b1"))
                            .outcome(OutcomeDraft::new("b2"))
                            .outcome(OutcomeDraft::new("b3")),
                    ),
            )
            .build();

        let set = ScenarioSet::enumerate(&snapshot, &keys(&snapshot, &["a", "b"]), &[], SCENARIO_CAP)
            .unwrap();
        assert_eq!(set.len(), 6);
        assert!(set.iter().all(|s| s.len() == 2));
    }

    #[test]
    fn containment_removes_the_violating_scenario() {
        let snapshot = SnapshotBuilder::new(1)
            .market(MarketDraft::new("m").condition(binary("a")).condition(binary("b")))
            .relation(RelationSpec::Containment {
                subset: "a-yes".into(),
                superset: "b-yes".into(),
            })
            .build();

        let conditions = keys(&snapshot, &["a", "b"]);
        let relations = snapshot.relations_within(&conditions);
        let set = ScenarioSet::enumerate(&snapshot, &conditions, &relations, SCENARIO_CAP).unwrap();

        assert_eq!(set.len(), 3);
        let a_yes = snapshot.outcome_key(&OutcomeId::from("a-yes")).unwrap();
        let b_no = snapshot.outcome_key(&OutcomeId::from("b-no")).unwrap();
        assert!(!set.iter().any(|s| s.contains(&a_yes) && s.contains(&b_no)));
    }

    #[test]
    fn contradictory_relations_are_reported() {
        let snapshot = SnapshotBuilder::new(1)
            .market(MarketDraft::new("m").condition(binary("a")).condition(binary("b")))
            .relation(RelationSpec::ExhaustivePartition {
                outcomes: vec!["a-yes".into(), "b-yes".into()],
            })
            .relation(RelationSpec::ExhaustivePartition {
                outcomes: vec!["a-no".into(), "b-no".into()],
            })
            .relation(RelationSpec::Containment {
                subset: "a-yes".into(),
                superset: "b-yes".into(),
            })
            .relation(RelationSpec::Containment {
                subset: "b-yes".into(),
                superset: "a-yes".into(),
            })
            .build();

        let conditions = keys(&snapshot, &["a", "b"]);
        let relations = snapshot.relations_within(&conditions);
        let err = ScenarioSet::enumerate(&snapshot, &conditions, &relations, SCENARIO_CAP).unwrap_err();
        assert_eq!(err, DomainError::ContradictoryRelations);
    }

    #[test]
    fn enumeration_stops_at_the_cap() {
        let mut market = MarketDraft::new("m");
        for i in 0..4 {
            market = market.condition(binary(&format!("c{i}")));
        }
        let snapshot = SnapshotBuilder::new(1).market(market).build();
        let conditions: Vec<_> = snapshot.condition_keys().collect();

        let err = ScenarioSet::enumerate(&snapshot, &conditions, &[], 8).unwrap_err();
        assert_eq!(err, DomainError::TooManyScenarios { cap: 8 });
        assert_eq!(
            ScenarioSet::enumerate(&snapshot, &conditions, &[], 16).unwrap().len(),
            16
        );
    }
}
