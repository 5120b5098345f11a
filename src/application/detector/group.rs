//! Connected groups of conditions joined by relations.

use std::collections::BTreeMap;

use crate::domain::id::ConditionKey;
use crate::domain::snapshot::Snapshot;

/// Conditions linked (transitively) by at least one relation, or a single
/// unrelated condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionGroup {
    /// Members in arena order.
    pub conditions: Vec<ConditionKey>,
    /// Number of relations whose operands fall inside the group.
    pub relations: usize,
    /// Total outcome count across members.
    pub outcomes: usize,
}

impl ConditionGroup {
    /// Whether Layer 2 should examine this group.
    ///
    /// Groups with a relation qualify, as does a lone condition with three or
    /// more outcomes (an implicit exhaustive partition). Unrelated binary
    /// conditions are left to Layer 1.
    #[must_use]
    pub fn is_combinatorial(&self) -> bool {
        self.relations > 0 || (self.conditions.len() == 1 && self.outcomes >= 3)
    }

    /// Human-readable scope for logs and diagnostics.
    #[must_use]
    pub fn label(&self, snapshot: &Snapshot) -> String {
        let ids: Vec<&str> = self
            .conditions
            .iter()
            .map(|&k| snapshot.condition(k).id().as_str())
            .collect();
        format!("group[{}]", ids.join(","))
    }
}

/// Partition every condition into connected groups (union-find over relation
/// operands). Groups come back ordered by their first member.
#[must_use]
pub fn group_conditions(snapshot: &Snapshot) -> Vec<ConditionGroup> {
    let n = snapshot.conditions().len();
    let mut sets = DisjointSet::new(n);

    for relation in snapshot.relations() {
        let mut operands = relation
            .operands()
            .into_iter()
            .map(|o| snapshot.outcome(o).condition().index());
        if let Some(first) = operands.next() {
            for other in operands {
                sets.union(first, other);
            }
        }
    }

    let mut groups: BTreeMap<usize, ConditionGroup> = BTreeMap::new();
    for key in snapshot.condition_keys() {
        let root = sets.find(key.index());
        let group = groups.entry(root).or_insert_with(|| ConditionGroup {
            conditions: Vec::new(),
            relations: 0,
            outcomes: 0,
        });
        group.conditions.push(key);
        group.outcomes += snapshot.condition(key).outcomes().len();
    }

    for relation in snapshot.relations() {
        if let Some(first) = relation.operands().first() {
            let root = sets.find(snapshot.outcome(*first).condition().index());
            if let Some(group) = groups.get_mut(&root) {
                group.relations += 1;
            }
        }
    }

    let mut out: Vec<ConditionGroup> = groups.into_values().collect();
    out.sort_by_key(|g| g.conditions[0]);
    out
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
