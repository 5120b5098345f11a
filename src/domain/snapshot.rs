//! Immutable, versioned view of markets, conditions and their order books.
//!
//! A [`Snapshot`] is an arena: markets, conditions and outcomes live in flat
//! vectors and reference each other through typed keys. Snapshots are only
//! produced by [`SnapshotBuilder::build`], which validates the raw drafts and
//! records every rejected item as a [`Diagnostic`] instead of failing.
//!
//! # Examples
//!
//! ```
//! use arbscan::domain::snapshot::{ConditionDraft, MarketDraft, OutcomeDraft, SnapshotBuilder};
//! use rust_decimal_macros::dec;
//!
//! let snapshot = SnapshotBuilder::new(1)
//!     .market(
//!         MarketDraft::new("election").condition(
//!             ConditionDraft::new("winner")
//!                 .outcome(OutcomeDraft::new("yes").ask(dec!(0.40), dec!(100)))
//!                 .outcome(OutcomeDraft::new("no").ask(dec!(0.55), dec!(80))),
//!         ),
//!     )
//!     .build();
//!
//! assert_eq!(snapshot.version(), 1);
//! assert_eq!(snapshot.conditions().len(), 1);
//! assert!(snapshot.diagnostics().is_empty());
//! ```

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::book::{OrderBook, PriceLevel};
use super::diagnostic::Diagnostic;
use super::error::DomainError;
use super::id::{ConditionId, ConditionKey, MarketId, OutcomeId, OutcomeKey};
use super::market::{Condition, Market, Outcome};
use super::money::{Price, Volume};
use super::relation::{ConstraintRelation, RelationSpec};

/// Raw outcome data before validation.
#[derive(Debug, Clone)]
pub struct OutcomeDraft {
    pub id: OutcomeId,
    pub name: Option<String>,
    pub bids: Vec<(Price, Volume)>,
    pub asks: Vec<(Price, Volume)>,
}

impl OutcomeDraft {
    pub fn new(id: impl Into<OutcomeId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a bid level.
    #[must_use]
    pub fn bid(mut self, price: Price, size: Volume) -> Self {
        self.bids.push((price, size));
        self
    }

    /// Add an ask level.
    #[must_use]
    pub fn ask(mut self, price: Price, size: Volume) -> Self {
        self.asks.push((price, size));
        self
    }
}

/// Raw condition data before validation.
#[derive(Debug, Clone)]
pub struct ConditionDraft {
    pub id: ConditionId,
    pub question: Option<String>,
    pub outcomes: Vec<OutcomeDraft>,
}

impl ConditionDraft {
    pub fn new(id: impl Into<ConditionId>) -> Self {
        Self {
            id: id.into(),
            question: None,
            outcomes: Vec::new(),
        }
    }

    #[must_use]
    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    #[must_use]
    pub fn outcome(mut self, outcome: OutcomeDraft) -> Self {
        self.outcomes.push(outcome);
        self
    }
}

/// Raw market data before validation.
#[derive(Debug, Clone)]
pub struct MarketDraft {
    pub id: MarketId,
    pub title: Option<String>,
    pub conditions: Vec<ConditionDraft>,
}

impl MarketDraft {
    pub fn new(id: impl Into<MarketId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            conditions: Vec::new(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: ConditionDraft) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// Collects drafts and validates them into a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    version: u64,
    markets: Vec<MarketDraft>,
    /// Unparseable relations keep their slot so diagnostics carry the
    /// document index.
    relations: Vec<std::result::Result<RelationSpec, DomainError>>,
    rejected: Vec<Diagnostic>,
}

impl SnapshotBuilder {
    #[must_use]
    pub const fn new(version: u64) -> Self {
        Self {
            version,
            markets: Vec::new(),
            relations: Vec::new(),
            rejected: Vec::new(),
        }
    }

    #[must_use]
    pub fn market(mut self, market: MarketDraft) -> Self {
        self.markets.push(market);
        self
    }

    #[must_use]
    pub fn relation(mut self, relation: RelationSpec) -> Self {
        self.relations.push(Ok(relation));
        self
    }

    /// Record a relation that could not be read. It takes up a relation
    /// index and is reported as a data error.
    #[must_use]
    pub fn malformed_relation(mut self, reason: impl Into<String>) -> Self {
        self.relations.push(Err(DomainError::MalformedRelation {
            reason: reason.into(),
        }));
        self
    }

    /// Record a book level that could not be read for `outcome`. The rest
    /// of the book is unaffected.
    #[must_use]
    pub fn malformed_level(mut self, outcome: &str, reason: impl Into<String>) -> Self {
        let err = DomainError::MalformedLevel {
            outcome: outcome.to_string(),
            reason: reason.into(),
        };
        warn!(outcome, error = %err, "rejected price level");
        self.rejected.push(Diagnostic::from_domain(outcome, &err));
        self
    }

    /// Validate every draft and assemble the arena.
    ///
    /// - levels with a price outside `(0, 1)` or a non-positive size are
    ///   dropped (numeric error), the rest of the book is kept
    /// - conditions with fewer than two outcomes, a repeated id or a crossed
    ///   book are dropped whole (data error)
    /// - relations naming unknown outcomes or with a degenerate shape are
    ///   dropped (data error)
    /// - levels and relations recorded as malformed are reported (data
    ///   error)
    #[must_use]
    pub fn build(self) -> Snapshot {
        let mut arena = Snapshot {
            version: self.version,
            markets: Vec::with_capacity(self.markets.len()),
            conditions: Vec::new(),
            outcomes: Vec::new(),
            relations: Vec::new(),
            diagnostics: self.rejected,
            condition_index: HashMap::new(),
            outcome_index: HashMap::new(),
        };

        for market in self.markets {
            let mut keys = Vec::with_capacity(market.conditions.len());
            for draft in market.conditions {
                if let Some(key) = arena.admit_condition(&market.id, draft) {
                    keys.push(key);
                }
            }
            arena.markets.push(Market::new(market.id, market.title, keys));
        }

        for (i, spec) in self.relations.into_iter().enumerate() {
            match spec.and_then(|spec| spec.resolve(|id| arena.outcome_index.get(id).copied())) {
                Ok(relation) => arena.relations.push(relation),
                Err(err) => {
                    debug!(relation = i, error = %err, "dropping relation");
                    arena
                        .diagnostics
                        .push(Diagnostic::from_domain(format!("relation[{i}]"), &err));
                }
            }
        }

        arena
    }
}

/// Immutable, versioned market view.
#[derive(Debug, Clone)]
pub struct Snapshot {
    version: u64,
    markets: Vec<Market>,
    conditions: Vec<Condition>,
    outcomes: Vec<Outcome>,
    relations: Vec<ConstraintRelation>,
    diagnostics: Vec<Diagnostic>,
    condition_index: HashMap<ConditionId, ConditionKey>,
    outcome_index: HashMap<OutcomeId, OutcomeKey>,
}

impl Snapshot {
    /// Start building a snapshot with the given version.
    #[must_use]
    pub const fn builder(version: u64) -> SnapshotBuilder {
        SnapshotBuilder::new(version)
    }

    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// All admitted conditions in arena order.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Keys of all admitted conditions in arena order.
    pub fn condition_keys(&self) -> impl Iterator<Item = ConditionKey> {
        (0..self.conditions.len()).map(ConditionKey)
    }

    #[must_use]
    pub fn condition(&self, key: ConditionKey) -> &Condition {
        &self.conditions[key.0]
    }

    #[must_use]
    pub fn outcome(&self, key: OutcomeKey) -> &Outcome {
        &self.outcomes[key.0]
    }

    #[must_use]
    pub fn condition_key(&self, id: &ConditionId) -> Option<ConditionKey> {
        self.condition_index.get(id).copied()
    }

    #[must_use]
    pub fn outcome_key(&self, id: &OutcomeId) -> Option<OutcomeKey> {
        self.outcome_index.get(id).copied()
    }

    /// Relations that survived validation.
    #[must_use]
    pub fn relations(&self) -> &[ConstraintRelation] {
        &self.relations
    }

    /// Relations whose operands all belong to `conditions`.
    #[must_use]
    pub fn relations_within(&self, conditions: &[ConditionKey]) -> Vec<&ConstraintRelation> {
        let members: HashSet<ConditionKey> = conditions.iter().copied().collect();
        self.relations
            .iter()
            .filter(|r| {
                r.operands()
                    .iter()
                    .all(|&o| members.contains(&self.outcome(o).condition()))
            })
            .collect()
    }

    /// Items rejected while the snapshot was assembled.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn admit_condition(&mut self, market: &MarketId, draft: ConditionDraft) -> Option<ConditionKey> {
        let scope = draft.id.to_string();

        if self.condition_index.contains_key(&draft.id) {
            self.reject(
                &scope,
                DomainError::DuplicateId {
                    kind: "condition",
                    id: scope.clone(),
                },
            );
            return None;
        }

        if draft.outcomes.len() < 2 {
            self.reject(
                &scope,
                DomainError::TooFewOutcomes {
                    condition: scope.clone(),
                    count: draft.outcomes.len(),
                },
            );
            return None;
        }

        let mut seen = HashSet::new();
        for outcome in &draft.outcomes {
            if self.outcome_index.contains_key(&outcome.id) || !seen.insert(&outcome.id) {
                self.reject(
                    &scope,
                    DomainError::DuplicateId {
                        kind: "outcome",
                        id: outcome.id.to_string(),
                    },
                );
                return None;
            }
        }

        let mut books = Vec::with_capacity(draft.outcomes.len());
        for outcome in &draft.outcomes {
            let book = OrderBook::new(
                self.admit_levels(&outcome.id, &outcome.bids),
                self.admit_levels(&outcome.id, &outcome.asks),
            );
            if book.is_crossed() {
                self.reject(
                    &scope,
                    DomainError::CrossedBook {
                        outcome: outcome.id.to_string(),
                    },
                );
                return None;
            }
            books.push(book);
        }

        let key = ConditionKey(self.conditions.len());
        let mut outcome_keys = Vec::with_capacity(books.len());
        for (outcome, book) in draft.outcomes.into_iter().zip(books) {
            let okey = OutcomeKey(self.outcomes.len());
            self.outcome_index.insert(outcome.id.clone(), okey);
            self.outcomes
                .push(Outcome::new(outcome.id, outcome.name, key, book));
            outcome_keys.push(okey);
        }

        self.condition_index.insert(draft.id.clone(), key);
        self.conditions.push(Condition::new(
            draft.id,
            market.clone(),
            draft.question,
            outcome_keys,
        ));
        Some(key)
    }

    fn admit_levels(&mut self, outcome: &OutcomeId, raw: &[(Price, Volume)]) -> Vec<PriceLevel> {
        let mut levels = Vec::with_capacity(raw.len());
        for &(price, size) in raw {
            let err = if price <= Decimal::ZERO || price >= Decimal::ONE {
                Some(DomainError::PriceOutOfRange {
                    outcome: outcome.to_string(),
                    price,
                })
            } else if size <= Decimal::ZERO {
                Some(DomainError::NonPositiveSize {
                    outcome: outcome.to_string(),
                    size,
                })
            } else {
                None
            };

            match err {
                Some(err) => {
                    warn!(outcome = %outcome, %price, %size, "rejected price level");
                    self.diagnostics
                        .push(Diagnostic::from_domain(outcome.as_str(), &err));
                }
                None => levels.push(PriceLevel::new(price, size)),
            }
        }
        levels
    }

    fn reject(&mut self, scope: &str, err: DomainError) {
        debug!(scope, error = %err, "dropping condition");
        self.diagnostics.push(Diagnostic::from_domain(scope, &err));
    }
}
